//! Board grouping records and their dependents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SoftDeletable;

/// Top-level board record grouping pinned notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Board {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: now,
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        }
    }

    /// Marks the board soft-deleted as of `at`.
    pub fn soft_delete(&mut self, at: DateTime<Utc>) {
        self.is_deleted = true;
        self.deleted_at = Some(at);
        self.updated_at = at;
    }
}

impl SoftDeletable for Board {
    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

/// Placement of a note on a board. Erasing the board removes its pins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pin {
    pub id: Uuid,
    pub board_id: Uuid,
    pub note_id: Uuid,
    pub position: u32,
    pub created_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Pin {
    pub fn new(board_id: Uuid, note_id: Uuid, position: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            board_id,
            note_id,
            position,
            created_at: Utc::now(),
            is_deleted: false,
            deleted_at: None,
        }
    }
}

impl SoftDeletable for Pin {
    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}
