//! In-memory record store backed by concurrent maps.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::models::{Attachment, Board, Comment, Label, Note, Pin, SoftDeletable};
use crate::retention::EntityKind;

use super::{PurgedSet, RecordStore};

/// In-memory implementation of the record store, one map per entity type.
#[derive(Default)]
pub struct MemoryRecordStore {
    notes: DashMap<Uuid, Note>,
    boards: DashMap<Uuid, Board>,
    comments: DashMap<Uuid, Comment>,
    attachments: DashMap<Uuid, Attachment>,
    pins: DashMap<Uuid, Pin>,
    labels: DashMap<Uuid, Label>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Erases every expired record from `partition` and returns their ids.
fn purge_expired<T: SoftDeletable>(
    partition: &DashMap<Uuid, T>,
    cutoff: DateTime<Utc>,
) -> PurgedSet {
    let ids: Vec<Uuid> = partition
        .iter()
        .filter(|entry| entry.value().is_expired(cutoff))
        .map(|entry| *entry.key())
        .collect();
    for id in &ids {
        partition.remove(id);
    }
    PurgedSet {
        deleted: ids.len() as u64,
        ids,
    }
}

/// Erases every record whose parent reference is in `parent_ids`.
fn delete_by_parent<T>(
    partition: &DashMap<Uuid, T>,
    parent_ids: &[Uuid],
    parent_of: impl Fn(&T) -> Uuid,
) -> u64 {
    let parents: HashSet<&Uuid> = parent_ids.iter().collect();
    let ids: Vec<Uuid> = partition
        .iter()
        .filter(|entry| parents.contains(&parent_of(entry.value())))
        .map(|entry| *entry.key())
        .collect();
    for id in &ids {
        partition.remove(id);
    }
    ids.len() as u64
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn purge_expired_notes(&self, cutoff: DateTime<Utc>) -> StoreResult<PurgedSet> {
        Ok(purge_expired(&self.notes, cutoff))
    }

    async fn purge_expired_boards(&self, cutoff: DateTime<Utc>) -> StoreResult<PurgedSet> {
        Ok(purge_expired(&self.boards, cutoff))
    }

    async fn delete_comments_by_notes(&self, note_ids: &[Uuid]) -> StoreResult<u64> {
        Ok(delete_by_parent(&self.comments, note_ids, |c| c.note_id))
    }

    async fn delete_attachments_by_notes(&self, note_ids: &[Uuid]) -> StoreResult<u64> {
        Ok(delete_by_parent(&self.attachments, note_ids, |a| a.note_id))
    }

    async fn delete_pins_by_boards(&self, board_ids: &[Uuid]) -> StoreResult<u64> {
        Ok(delete_by_parent(&self.pins, board_ids, |p| p.board_id))
    }

    async fn pull_notes_from_labels(&self, note_ids: &[Uuid]) -> StoreResult<u64> {
        let parents: HashSet<&Uuid> = note_ids.iter().collect();
        let mut modified = 0;
        for mut entry in self.labels.iter_mut() {
            let label = entry.value_mut();
            let before = label.note_ids.len();
            label.note_ids.retain(|id| !parents.contains(id));
            if label.note_ids.len() != before {
                label.updated_at = Utc::now();
                modified += 1;
            }
        }
        Ok(modified)
    }

    async fn insert_note(&self, note: Note) -> StoreResult<()> {
        self.notes.insert(note.id, note);
        Ok(())
    }

    async fn insert_board(&self, board: Board) -> StoreResult<()> {
        self.boards.insert(board.id, board);
        Ok(())
    }

    async fn insert_comment(&self, comment: Comment) -> StoreResult<()> {
        self.comments.insert(comment.id, comment);
        Ok(())
    }

    async fn insert_attachment(&self, attachment: Attachment) -> StoreResult<()> {
        self.attachments.insert(attachment.id, attachment);
        Ok(())
    }

    async fn insert_pin(&self, pin: Pin) -> StoreResult<()> {
        self.pins.insert(pin.id, pin);
        Ok(())
    }

    async fn insert_label(&self, label: Label) -> StoreResult<()> {
        self.labels.insert(label.id, label);
        Ok(())
    }

    async fn count(&self, entity: EntityKind) -> u64 {
        let count = match entity {
            EntityKind::Note => self.notes.len(),
            EntityKind::Board => self.boards.len(),
            EntityKind::Comment => self.comments.len(),
            EntityKind::Attachment => self.attachments.len(),
            EntityKind::Pin => self.pins.len(),
            EntityKind::Label => self.labels.len(),
        };
        count as u64
    }

    async fn get_note(&self, id: Uuid) -> Option<Note> {
        self.notes.get(&id).map(|n| n.value().clone())
    }

    async fn get_label(&self, id: Uuid) -> Option<Label> {
        self.labels.get(&id).map(|l| l.value().clone())
    }
}
