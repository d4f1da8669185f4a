//! Request routing for the retention admin API.

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::handlers;
use crate::retention::{RetentionScheduler, StatusReporter};
use crate::storage::RecordStore;

/// Application state shared between handlers.
#[derive(Clone)]
pub struct AppState {
    pub scheduler: RetentionScheduler,
    pub reporter: StatusReporter,
    pub store: Arc<dyn RecordStore>,
}

/// Creates the router for the admin service.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/admin/retention/start", post(handlers::start_scheduler))
        .route("/admin/retention/stop", post(handlers::stop_scheduler))
        .route("/admin/retention/status", get(handlers::scheduler_status))
        .route("/admin/retention/trigger", post(handlers::trigger_sweep))
        .route("/admin/retention/settings", put(handlers::update_settings))
        .route("/admin/seed", post(handlers::seed_records))
        .route("/admin/counts", get(handlers::record_counts))
        .with_state(state)
}
