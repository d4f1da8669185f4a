//! Storage layer for workspace records.

mod memory;

pub use memory::*;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StoreResult;
use crate::models::{Attachment, Board, Comment, Label, Note, Pin};
use crate::retention::EntityKind;

/// Identifiers and count returned by a bulk purge of expired records.
#[derive(Debug, Clone, Default)]
pub struct PurgedSet {
    /// Number of records erased.
    pub deleted: u64,
    /// Identifiers of the erased records, consumed by dependency edges.
    pub ids: Vec<Uuid>,
}

/// Bulk record operations, one storage partition per entity type.
///
/// Every operation is a single bulk statement against one partition; the
/// filters are monotonic, so re-running any of them is always safe and no
/// transaction spans partitions.
#[async_trait]
pub trait RecordStore: Send + Sync {
    // Primary partitions: erase soft-deleted records past the cutoff.
    async fn purge_expired_notes(&self, cutoff: DateTime<Utc>) -> StoreResult<PurgedSet>;
    async fn purge_expired_boards(&self, cutoff: DateTime<Utc>) -> StoreResult<PurgedSet>;

    // Dependent partitions: cascade deletes keyed by erased parent ids.
    async fn delete_comments_by_notes(&self, note_ids: &[Uuid]) -> StoreResult<u64>;
    async fn delete_attachments_by_notes(&self, note_ids: &[Uuid]) -> StoreResult<u64>;
    async fn delete_pins_by_boards(&self, board_ids: &[Uuid]) -> StoreResult<u64>;

    // Reference pulls: strip erased parent ids from reference arrays,
    // keeping the records themselves.
    async fn pull_notes_from_labels(&self, note_ids: &[Uuid]) -> StoreResult<u64>;

    // Record insertion and inspection, used by the seed surface and tests.
    async fn insert_note(&self, note: Note) -> StoreResult<()>;
    async fn insert_board(&self, board: Board) -> StoreResult<()>;
    async fn insert_comment(&self, comment: Comment) -> StoreResult<()>;
    async fn insert_attachment(&self, attachment: Attachment) -> StoreResult<()>;
    async fn insert_pin(&self, pin: Pin) -> StoreResult<()>;
    async fn insert_label(&self, label: Label) -> StoreResult<()>;

    async fn count(&self, entity: EntityKind) -> u64;
    async fn get_note(&self, id: Uuid) -> Option<Note>;
    async fn get_label(&self, id: Uuid) -> Option<Label>;
}
