//! Administrative handlers for the retention scheduler.
//!
//! The service is expected to run behind a role-gated gateway; these
//! handlers perform no authorization of their own.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Duration;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::{ConfigError, StoreError};
use crate::models::{Attachment, Board, Comment, Label, Note, Pin};
use crate::retention::{EntityKind, SchedulerStatus, SweepStats};
use crate::router::AppState;

/// POST /admin/retention/start - arm the sweep timer.
pub async fn start_scheduler(State(state): State<AppState>) -> Json<SchedulerStatus> {
    state.scheduler.start();
    Json(state.reporter.status())
}

/// POST /admin/retention/stop - disarm the sweep timer.
pub async fn stop_scheduler(State(state): State<AppState>) -> Json<SchedulerStatus> {
    state.scheduler.stop();
    Json(state.reporter.status())
}

/// GET /admin/retention/status - current lifecycle state.
pub async fn scheduler_status(State(state): State<AppState>) -> Json<SchedulerStatus> {
    Json(state.reporter.status())
}

/// POST /admin/retention/trigger - run one sweep now and return its stats.
///
/// A non-error response does not imply a fully successful sweep; callers
/// must inspect `errors` for partial failure.
pub async fn trigger_sweep(State(state): State<AppState>) -> Json<SweepStats> {
    Json(state.scheduler.trigger().await)
}

/// Body for PUT /admin/retention/settings. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSettings {
    pub retention_period_hours: Option<i64>,
    pub sweep_interval_hours: Option<i64>,
}

/// PUT /admin/retention/settings - update the retention policy.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(settings): Json<UpdateSettings>,
) -> Result<Json<SchedulerStatus>, ConfigError> {
    state.scheduler.update_policy(
        settings.retention_period_hours.map(Duration::hours),
        settings.sweep_interval_hours.map(Duration::hours),
    )?;
    Ok(Json(state.reporter.status()))
}

/// Record fixtures for POST /admin/seed.
#[derive(Debug, Default, Deserialize)]
pub struct SeedRecords {
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub boards: Vec<Board>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub pins: Vec<Pin>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

/// POST /admin/seed - load record fixtures into the store. Development and
/// test surface; the production write path belongs to the main application.
pub async fn seed_records(
    State(state): State<AppState>,
    Json(seed): Json<SeedRecords>,
) -> Result<StatusCode, StoreError> {
    for note in seed.notes {
        state.store.insert_note(note).await?;
    }
    for board in seed.boards {
        state.store.insert_board(board).await?;
    }
    for comment in seed.comments {
        state.store.insert_comment(comment).await?;
    }
    for attachment in seed.attachments {
        state.store.insert_attachment(attachment).await?;
    }
    for pin in seed.pins {
        state.store.insert_pin(pin).await?;
    }
    for label in seed.labels {
        state.store.insert_label(label).await?;
    }
    Ok(StatusCode::CREATED)
}

/// GET /admin/counts - live record counts per entity type.
pub async fn record_counts(State(state): State<AppState>) -> Json<BTreeMap<EntityKind, u64>> {
    let mut counts = BTreeMap::new();
    for entity in EntityKind::ALL {
        counts.insert(entity, state.store.count(entity).await);
    }
    Json(counts)
}
