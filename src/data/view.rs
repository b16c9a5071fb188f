use crate::data::note::Note;

/// Notes to display, split into the pinned and unpinned sections
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Projection<'n> {
	pub pinned: Vec<&'n Note>,
	pub others: Vec<&'n Note>,
}

impl Projection<'_> {
	pub fn is_empty(&self) -> bool {
		self.pinned.is_empty() && self.others.is_empty()
	}

	pub fn len(&self) -> usize {
		self.pinned.len() + self.others.len()
	}
}

/// Trimmed, lowercased form of a search query
pub fn normalize_query(query: &str) -> String {
	query.trim().to_lowercase()
}

/// Drops archived notes and notes not matching `query`, then partitions the
/// rest by their pinned flag. Relative order is preserved in both sections.
pub fn project<'n>(notes: &'n [Note], query: &str) -> Projection<'n> {
	let query = normalize_query(query);
	let (pinned, others) = notes
		.iter()
		.filter(|note| !note.archived)
		.filter(|note| note.matches(&query))
		.partition(|note| note.pinned);
	Projection { pinned, others }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn note(id: &str, title: &str, content: &str, pinned: bool, archived: bool) -> Note {
		Note {
			id: id.into(),
			title: title.into(),
			content: content.into(),
			color: "#fff".into(),
			pinned,
			archived,
			created_at: 0,
		}
	}

	fn ids(notes: &[&Note]) -> Vec<String> {
		notes.iter().map(|n| n.id.clone()).collect()
	}

	fn board() -> Vec<Note> {
		vec![
			note("1", "Milk", "buy", false, false),
			note("2", "Bread", "", true, false),
			note("3", "Secret", "milk", true, true),
			note("4", "", "Call the bank", false, false),
			note("5", "Plans", "trip", true, false),
			note("6", "Old", "milk run", false, true),
		]
	}

	#[test]
	fn empty_query_partitions_non_archived() {
		let notes = board();
		let view = project(&notes, "");
		assert_eq!(ids(&view.pinned), ["2", "5"]);
		assert_eq!(ids(&view.others), ["1", "4"]);
		assert_eq!(view.len(), notes.iter().filter(|n| !n.archived).count());
	}

	#[test]
	fn query_matches_case_insensitively() {
		let notes = board();
		let view = project(&notes, "MILK");
		assert!(view.pinned.is_empty());
		assert_eq!(ids(&view.others), ["1"]);

		let view = project(&notes, "  bank ");
		assert_eq!(ids(&view.others), ["4"]);
	}

	#[test]
	fn unmatched_query_is_empty() {
		let notes = board();
		let view = project(&notes, "xyz");
		assert!(view.is_empty());
		assert_eq!(view, Projection::default());
	}

	#[test]
	fn single_note_example() {
		let notes = vec![note("1", "Milk", "buy", false, false)];
		let view = project(&notes, "milk");
		assert_eq!(ids(&view.others), ["1"]);
		assert!(view.pinned.is_empty());
		assert!(project(&notes, "bread").is_empty());
	}

	#[test]
	fn archived_never_shown() {
		let notes = board();
		for query in ["", "milk", "secret", "old"] {
			let view = project(&notes, query);
			let shown = ids(&view.pinned)
				.into_iter()
				.chain(ids(&view.others))
				.collect::<Vec<_>>();
			assert!(!shown.contains(&"3".to_string()));
			assert!(!shown.contains(&"6".to_string()));
		}
	}
}
