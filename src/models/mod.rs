//! Data models for workspace records.

mod board;
mod label;
mod note;

pub use board::*;
pub use label::*;
pub use note::*;

use chrono::{DateTime, Utc};

/// A record that supports soft deletion ahead of permanent erasure.
///
/// User-facing deletes only flip the flag and stamp `deleted_at`; the
/// retention subsystem erases the record once the grace period elapses.
pub trait SoftDeletable {
    fn is_deleted(&self) -> bool;
    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    /// Whether the record's grace period had elapsed at `cutoff`.
    fn is_expired(&self, cutoff: DateTime<Utc>) -> bool {
        self.is_deleted() && self.deleted_at().is_some_and(|at| at < cutoff)
    }
}
