//! Custodian: retention and garbage collection for soft-deleted workspace
//! records.
//!
//! Records are never erased synchronously by user action; they are
//! soft-deleted and a recurring sweep permanently erases them once the
//! grace period elapses, cascading the erasure along a declared dependency
//! graph (comments and attachments of an erased note, pins of an erased
//! board, note references held by labels).
//!
//! # Example
//!
//! ```no_run
//! use custodian::{Config, RetentionServer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = RetentionServer::new(Config::default()).unwrap();
//!     server.run().await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod retention;
pub mod router;
pub mod server;
pub mod storage;

// Re-exports for convenience
pub use config::{Args, Config, DEFAULT_ADMIN_PORT, DEFAULT_RETENTION_HOURS, DEFAULT_SWEEP_INTERVAL_HOURS};
pub use error::{ConfigError, StoreError, StoreResult};
pub use retention::{
    Clock, GcEngine, ManualClock, RetentionPolicy, RetentionScheduler, SchedulerStatus,
    StatusReporter, SweepStats, SystemClock,
};
pub use server::{RetentionServer, RetentionServerBuilder};
pub use storage::{MemoryRecordStore, PurgedSet, RecordStore};
