//! Read-only status view over the scheduler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RetentionScheduler;

/// Snapshot of the scheduler's lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerStatus {
    pub is_running: bool,
    /// Estimated time of the next scheduled sweep; absent while stopped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_sweep_at: Option<DateTime<Utc>>,
}

/// Thin read-only reporter consumed by the admin interface.
#[derive(Clone)]
pub struct StatusReporter {
    scheduler: RetentionScheduler,
}

impl StatusReporter {
    pub fn new(scheduler: RetentionScheduler) -> Self {
        Self { scheduler }
    }

    /// Returns the current lifecycle state. No side effects.
    pub fn status(&self) -> SchedulerStatus {
        SchedulerStatus {
            is_running: self.scheduler.is_running(),
            next_sweep_at: self.scheduler.next_sweep_at(),
        }
    }
}
