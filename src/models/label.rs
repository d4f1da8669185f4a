//! Label records referencing notes by id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SoftDeletable;

/// User-defined label. Holds a reference array of note ids; erasing a note
/// strips its id from the array, the label itself survives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub note_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Label {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color: color.into(),
            note_ids: Vec::new(),
            created_at: now,
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        }
    }

    /// Adds a note reference if not already present.
    pub fn attach_note(&mut self, note_id: Uuid) {
        if !self.note_ids.contains(&note_id) {
            self.note_ids.push(note_id);
            self.updated_at = Utc::now();
        }
    }
}

impl SoftDeletable for Label {
    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}
