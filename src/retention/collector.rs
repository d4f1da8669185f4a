//! Per-entity-type collectors driving bulk store operations.
//!
//! Each collector owns the find/delete/update calls for exactly one entity
//! type. Collectors never swallow store errors; the engine decides what a
//! failed step means for the rest of the sweep.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StoreResult;
use crate::storage::{PurgedSet, RecordStore};

use super::{CascadeKind, EntityKind};

/// Collector for a primary (root) entity type.
#[async_trait]
pub trait PrimaryCollector: Send + Sync {
    fn entity(&self) -> EntityKind;

    /// Erases every soft-deleted record past `cutoff` in one bulk operation
    /// and returns the erased ids for the dependency edges.
    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> StoreResult<PurgedSet>;
}

/// Collector for a dependent entity type reached through a dependency edge.
#[async_trait]
pub trait DependentCollector: Send + Sync {
    fn entity(&self) -> EntityKind;

    /// The cleanup operation this collector performs.
    fn kind(&self) -> CascadeKind;

    /// Applies the cleanup to records referencing `parent_ids`: deletion for
    /// `CascadeDelete`, reference stripping for `PullReference`. Returns the
    /// number of records deleted or modified. Must return 0 without touching
    /// the store when `parent_ids` is empty.
    async fn remove_for_parents(&self, parent_ids: &[Uuid]) -> StoreResult<u64>;
}

/// Primary collector for notes.
pub struct NoteCollector {
    store: Arc<dyn RecordStore>,
}

impl NoteCollector {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PrimaryCollector for NoteCollector {
    fn entity(&self) -> EntityKind {
        EntityKind::Note
    }

    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> StoreResult<PurgedSet> {
        self.store.purge_expired_notes(cutoff).await
    }
}

/// Primary collector for boards.
pub struct BoardCollector {
    store: Arc<dyn RecordStore>,
}

impl BoardCollector {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PrimaryCollector for BoardCollector {
    fn entity(&self) -> EntityKind {
        EntityKind::Board
    }

    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> StoreResult<PurgedSet> {
        self.store.purge_expired_boards(cutoff).await
    }
}

/// Cascade collector for comments attached to erased notes.
pub struct CommentCollector {
    store: Arc<dyn RecordStore>,
}

impl CommentCollector {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DependentCollector for CommentCollector {
    fn entity(&self) -> EntityKind {
        EntityKind::Comment
    }

    fn kind(&self) -> CascadeKind {
        CascadeKind::CascadeDelete
    }

    async fn remove_for_parents(&self, parent_ids: &[Uuid]) -> StoreResult<u64> {
        if parent_ids.is_empty() {
            return Ok(0);
        }
        self.store.delete_comments_by_notes(parent_ids).await
    }
}

/// Cascade collector for attachments of erased notes.
pub struct AttachmentCollector {
    store: Arc<dyn RecordStore>,
}

impl AttachmentCollector {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DependentCollector for AttachmentCollector {
    fn entity(&self) -> EntityKind {
        EntityKind::Attachment
    }

    fn kind(&self) -> CascadeKind {
        CascadeKind::CascadeDelete
    }

    async fn remove_for_parents(&self, parent_ids: &[Uuid]) -> StoreResult<u64> {
        if parent_ids.is_empty() {
            return Ok(0);
        }
        self.store.delete_attachments_by_notes(parent_ids).await
    }
}

/// Pull collector stripping erased note ids from label reference arrays.
pub struct LabelCollector {
    store: Arc<dyn RecordStore>,
}

impl LabelCollector {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DependentCollector for LabelCollector {
    fn entity(&self) -> EntityKind {
        EntityKind::Label
    }

    fn kind(&self) -> CascadeKind {
        CascadeKind::PullReference
    }

    async fn remove_for_parents(&self, parent_ids: &[Uuid]) -> StoreResult<u64> {
        if parent_ids.is_empty() {
            return Ok(0);
        }
        self.store.pull_notes_from_labels(parent_ids).await
    }
}

/// Cascade collector for pins of erased boards.
pub struct PinCollector {
    store: Arc<dyn RecordStore>,
}

impl PinCollector {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DependentCollector for PinCollector {
    fn entity(&self) -> EntityKind {
        EntityKind::Pin
    }

    fn kind(&self) -> CascadeKind {
        CascadeKind::CascadeDelete
    }

    async fn remove_for_parents(&self, parent_ids: &[Uuid]) -> StoreResult<u64> {
        if parent_ids.is_empty() {
            return Ok(0);
        }
        self.store.delete_pins_by_boards(parent_ids).await
    }
}
