use std::collections::HashSet;

use crate::data::note::Note;
use crate::data::palette::DEFAULT_COLOR;
use crate::data::store::Store;
use crate::data::view::normalize_query;
use crate::data::view::project;
use crate::data::view::Projection;

/// In-memory note collection, kept in sync with its [`Store`].
///
/// Notes are ordered newest first. Every mutation writes the whole collection
/// back before returning.
pub struct NoteRepository {
	store: Store,
	notes: Vec<Note>,
	selected_color: String,
	query: String,
}

impl NoteRepository {
	pub fn open(store: Store) -> Self {
		let mut notes = store.load();
		repair_ids(&mut notes);
		tracing::debug!(key = store.key(), count = notes.len(), "loaded notes");
		Self {
			store,
			notes,
			selected_color: DEFAULT_COLOR.into(),
			query: String::default(),
		}
	}

	pub fn notes(&self) -> &[Note] {
		&self.notes
	}

	pub fn get(&self, id: &str) -> Option<&Note> {
		self.notes.iter().find(|n| n.id == id)
	}

	pub fn store(&self) -> &Store {
		&self.store
	}

	pub fn query(&self) -> &str {
		&self.query
	}

	pub fn selected_color(&self) -> &str {
		&self.selected_color
	}

	/// Notes to display under the current query
	pub fn view(&self) -> Projection<'_> {
		project(&self.notes, &self.query)
	}

	/// Adds a note at the front of the collection.
	///
	/// Returns [`None`] without touching anything when both title and content
	/// are blank.
	pub fn add(&mut self, title: &str, content: &str, color: &str) -> Option<&Note> {
		let (title, content) = (title.trim(), content.trim());
		if title.is_empty() && content.is_empty() {
			return None;
		}

		let note = Note::new(title.into(), content.into(), color.into());
		tracing::debug!(id = %note.id, "adding note");
		self.notes.insert(0, note);
		self.persist();
		self.notes.first()
	}

	pub fn toggle_pin(&mut self, id: &str) -> bool {
		let found = match self.notes.iter_mut().find(|n| n.id == id) {
			Some(note) => {
				note.pinned = !note.pinned;
				tracing::debug!(id, pinned = note.pinned, "toggled pin");
				true
			}
			None => false,
		};
		self.persist();
		found
	}

	/// Hides a note for good, there is no way back from the board
	pub fn archive(&mut self, id: &str) -> bool {
		let found = match self.notes.iter_mut().find(|n| n.id == id) {
			Some(note) => {
				note.archived = true;
				tracing::debug!(id, "archived note");
				true
			}
			None => false,
		};
		self.persist();
		found
	}

	pub fn delete(&mut self, id: &str) -> bool {
		let len = self.notes.len();
		self.notes.retain(|n| n.id != id);
		let found = self.notes.len() != len;
		if found {
			tracing::debug!(id, "deleted note");
		}
		self.persist();
		found
	}

	/// Inserts a copy of note `id` at the front of the collection
	pub fn duplicate(&mut self, id: &str) -> Option<&Note> {
		let copy = self.get(id).map(Note::duplicate);
		let copied = copy.is_some();
		if let Some(copy) = copy {
			tracing::debug!(source = id, id = %copy.id, "duplicated note");
			self.notes.insert(0, copy);
		}
		self.persist();
		self.notes.first().filter(|_| copied)
	}

	pub fn set_query(&mut self, query: &str) {
		self.query = normalize_query(query);
	}

	pub fn set_selected_color(&mut self, color: &str) {
		self.selected_color = color.into();
	}

	fn persist(&mut self) {
		if let Err(err) = self.store.save(&self.notes) {
			tracing::error!(key = self.store.key(), "failed to save notes: {err}");
		}
	}
}

/// Gives a fresh id to every note whose id was already seen earlier in the
/// collection, so ids stay unique even for hand-edited data
fn repair_ids(notes: &mut [Note]) {
	let mut seen = HashSet::new();
	for note in notes.iter_mut() {
		while !seen.insert(note.id.clone()) {
			tracing::warn!(id = %note.id, "replacing duplicate note id");
			note.regenerate_id();
		}
	}
}
