//! Timeline annotations
//!
//! Notes are either pinned to a single timestamp or cover a span of the
//! timeline. The selection manager only reads them, through [`NoteStore`].

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::context::NoteStore;
use crate::time::Time;

/// Unique identifier for a note
pub type NoteId = String;

/// Where on the timeline a note sits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteType {
    /// Marks a single instant
    Default { timestamp: Time },
    /// Covers `[start, end]`
    Span { start: Time, end: Time },
}

/// Represents a note in the system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub text: String,
    /// CSS-style color string
    pub color: String,
    pub note_type: NoteType,
}

/// Note manager handles storage and retrieval of notes
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NoteManager {
    notes: HashMap<NoteId, Note>,
}

impl NoteManager {
    /// Create a new note manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a note, replacing any note with the same id
    pub fn add_note(&mut self, note: Note) -> NoteId {
        let id = note.id.clone();
        self.notes.insert(id.clone(), note);
        id
    }

    /// Create and add a new note with a fresh id
    pub fn create_note(&mut self, text: String, color: String, note_type: NoteType) -> NoteId {
        self.add_note(Note {
            id: Uuid::new_v4().to_string(),
            text,
            color,
            note_type,
        })
    }

    /// Update the text of an existing note
    pub fn update_note_text(&mut self, id: &str, text: String) -> Option<()> {
        let note = self.notes.get_mut(id)?;
        note.text = text;
        Some(())
    }

    /// Delete a note
    pub fn remove_note(&mut self, id: &str) -> Option<Note> {
        self.notes.remove(id)
    }

    /// Get a note by ID
    pub fn get_note(&self, id: &str) -> Option<&Note> {
        self.notes.get(id)
    }

    /// Get all notes
    pub fn all_notes(&self) -> impl Iterator<Item = &Note> {
        self.notes.values()
    }
}

impl NoteStore for RwLock<NoteManager> {
    fn get_note(&self, id: &str) -> Option<Note> {
        self.read().get_note(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_creation() {
        let mut manager = NoteManager::new();

        let id = manager.create_note(
            "Test note".to_string(),
            "#ff0000".to_string(),
            NoteType::Default { timestamp: 42 },
        );

        assert!(manager.get_note(&id).is_some());
        assert_eq!(manager.all_notes().count(), 1);
    }

    #[test]
    fn test_update_and_remove() {
        let mut manager = NoteManager::new();
        let id = manager.create_note(
            "before".to_string(),
            "#00ff00".to_string(),
            NoteType::Span { start: 1, end: 9 },
        );

        assert_eq!(manager.update_note_text(&id, "after".to_string()), Some(()));
        assert_eq!(manager.get_note(&id).map(|n| n.text.as_str()), Some("after"));
        assert!(manager.update_note_text("missing", String::new()).is_none());

        assert!(manager.remove_note(&id).is_some());
        assert!(manager.get_note(&id).is_none());
    }

    #[test]
    fn test_shared_store_lookup() {
        let store = RwLock::new(NoteManager::new());
        let id = store.write().create_note(
            "shared".to_string(),
            "#0000ff".to_string(),
            NoteType::Default { timestamp: 3 },
        );

        let note = NoteStore::get_note(&store, &id).unwrap();
        assert_eq!(note.note_type, NoteType::Default { timestamp: 3 });
        assert!(NoteStore::get_note(&store, "nope").is_none());
    }
}
