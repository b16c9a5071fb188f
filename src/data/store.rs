use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::data::note::Note;

/// Slot the board stores its notes under unless told otherwise
pub const DEFAULT_KEY: &str = "keep-notes-clone-v1";

#[derive(Debug, Error)]
pub enum StoreError {
	#[error("invalid slot key '{0}'")]
	InvalidKey(String),
	#[error("failed to read '{}': {source}", .path.display())]
	Read { path: PathBuf, source: io::Error },
	#[error("failed to write '{}': {source}", .path.display())]
	Write { path: PathBuf, source: io::Error },
	#[error("failed to serialize notes: {0}")]
	Serialize(#[from] serde_json::Error),
}

/// Durable string slots addressed by key
pub trait KeyValue {
	fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
	fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Keeps each slot in `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct DirBackend {
	dir: PathBuf,
}

impl DirBackend {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
		if key.is_empty() || key.starts_with('.') || key.contains(['/', '\\']) {
			return Err(StoreError::InvalidKey(key.into()));
		}
		Ok(self.dir.join(format!("{key}.json")))
	}
}

impl KeyValue for DirBackend {
	fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
		let path = self.path_for(key)?;
		match fs::read_to_string(&path) {
			Ok(value) => Ok(Some(value)),
			Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
			Err(source) => Err(StoreError::Read { path, source }),
		}
	}

	fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
		let path = self.path_for(key)?;
		fs::create_dir_all(&self.dir).map_err(|source| StoreError::Write {
			path: self.dir.clone(),
			source,
		})?;

		// Write next to the slot then swap it in, readers never see a partial slot
		let tmp = path.with_extension("json.tmp");
		fs::write(&tmp, value).map_err(|source| StoreError::Write {
			path: tmp.clone(),
			source,
		})?;
		fs::rename(&tmp, &path).map_err(|source| StoreError::Write { path, source })
	}
}

/// Slots that live as long as the process
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
	slots: HashMap<String, String>,
}

impl MemoryBackend {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_slot(mut self, key: &str, value: &str) -> Self {
		self.slots.insert(key.into(), value.into());
		self
	}
}

impl KeyValue for MemoryBackend {
	fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
		Ok(self.slots.get(key).cloned())
	}

	fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
		self.slots.insert(key.into(), value.into());
		Ok(())
	}
}

/// Reads and writes the whole note collection as one JSON array in one slot
pub struct Store {
	backend: Box<dyn KeyValue>,
	key: String,
}

impl Store {
	pub fn new(backend: impl KeyValue + 'static, key: impl Into<String>) -> Self {
		Self {
			backend: Box::new(backend),
			key: key.into(),
		}
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	/// Loads the collection.
	///
	/// An absent slot, or one that is not a JSON array, yields an empty
	/// collection. Elements that are not objects are dropped.
	pub fn load(&self) -> Vec<Note> {
		let raw = match self.backend.get(&self.key) {
			Ok(Some(raw)) => raw,
			Ok(None) => return vec![],
			Err(err) => {
				tracing::warn!(key = %self.key, "starting with no notes: {err}");
				return vec![];
			}
		};
		let Ok(records) = serde_json::from_str::<Vec<serde_json::Value>>(&raw) else {
			return vec![];
		};
		// Records are read one by one so a single unusable element does not
		// cost the rest of the collection
		records
			.into_iter()
			.filter(serde_json::Value::is_object)
			.filter_map(|record| serde_json::from_value(record).ok())
			.collect()
	}

	/// Overwrites the slot with `notes`
	pub fn save(&mut self, notes: &[Note]) -> Result<(), StoreError> {
		let raw = serde_json::to_string(notes)?;
		self.backend.set(&self.key, &raw)
	}
}
