use chrono::Utc;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Value;

use crate::data::palette::DEFAULT_COLOR;

fn new_id() -> String {
	uuid::Uuid::new_v4().to_string()
}

fn default_color() -> String {
	DEFAULT_COLOR.into()
}

/// Scalar as text, other JSON values yield [`None`]
fn scalar_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
	Ok(match Value::deserialize(deserializer)? {
		Value::String(s) => Some(s),
		Value::Number(n) => Some(n.to_string()),
		Value::Bool(b) => Some(b.to_string()),
		_ => None,
	})
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
	Ok(scalar_text(deserializer)?.unwrap_or_else(new_id))
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
	Ok(scalar_text(deserializer)?.unwrap_or_default())
}

fn lenient_color<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
	Ok(scalar_text(deserializer)?.unwrap_or_else(default_color))
}

/// Only a literal `true` sets a flag
fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
	Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

fn lenient_millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
	Ok(match Value::deserialize(deserializer)? {
		Value::Number(n) => n
			.as_i64()
			.or_else(|| n.as_f64().map(|f| f as i64))
			.unwrap_or_default(),
		_ => 0,
	})
}

/// Milliseconds since the unix epoch
pub fn now_millis() -> i64 {
	Utc::now().timestamp_millis()
}

/// A single note on the board.
///
/// Records written by older versions or edited by hand may lack keys or hold
/// `null` and other JSON types, every field therefore falls back to a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
	#[serde(default = "new_id", deserialize_with = "lenient_id")]
	pub id: String,
	#[serde(default, deserialize_with = "lenient_text")]
	pub title: String,
	#[serde(default, deserialize_with = "lenient_text")]
	pub content: String,
	#[serde(default = "default_color", deserialize_with = "lenient_color")]
	pub color: String,
	#[serde(default, deserialize_with = "lenient_flag")]
	pub pinned: bool,
	#[serde(default, deserialize_with = "lenient_flag")]
	pub archived: bool,
	#[serde(default, deserialize_with = "lenient_millis")]
	pub created_at: i64,
}

impl Note {
	/// Creates an unpinned, unarchived note stamped with the current time
	pub fn new(title: String, content: String, color: String) -> Self {
		Self {
			id: new_id(),
			title,
			content,
			color,
			pinned: false,
			archived: false,
			created_at: now_millis(),
		}
	}

	/// Copy of this note with a fresh id and timestamp, never pinned
	pub fn duplicate(&self) -> Self {
		Self {
			id: new_id(),
			pinned: false,
			created_at: now_millis(),
			..self.clone()
		}
	}

	/// Gives the note a new id, used to repair collisions in loaded data
	pub fn regenerate_id(&mut self) {
		self.id = new_id();
	}

	/// Title shown on cards
	pub fn display_title(&self) -> &str {
		if self.title.trim().is_empty() {
			"Untitled"
		} else {
			&self.title
		}
	}

	/// Whether this note matches an already normalized search query
	pub fn matches(&self, query: &str) -> bool {
		query.is_empty()
			|| format!("{} {}", self.title, self.content)
				.to_lowercase()
				.contains(query)
	}
}
