//! Error types for the retention service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure of a bulk operation against the backing record store.
///
/// Collectors propagate these unchanged; isolating a failed entity type so
/// the rest of a sweep can proceed is the engine's job, not the store's.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The operation did not complete within the store's own deadline.
    #[error("store operation timed out: {0}")]
    Timeout(String),

    /// The store rejected or failed the operation.
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            StoreError::Unavailable(_) | StoreError::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            StoreError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "code": "StoreError",
            "message": self.to_string(),
        }));
        (self.status_code(), body).into_response()
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Rejected retention settings. The previous value is always retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A retention period must be strictly positive.
    #[error("retention period must be positive")]
    InvalidRetentionPeriod,

    /// A sweep interval must be strictly positive.
    #[error("sweep interval must be positive")]
    InvalidSweepInterval,
}

impl ConfigError {
    /// Returns the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigError::InvalidRetentionPeriod => "InvalidRetentionPeriod",
            ConfigError::InvalidSweepInterval => "InvalidSweepInterval",
        }
    }
}

impl IntoResponse for ConfigError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "code": self.as_str(),
            "message": self.to_string(),
        }));
        (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_codes() {
        assert_eq!(
            ConfigError::InvalidRetentionPeriod.as_str(),
            "InvalidRetentionPeriod"
        );
        assert_eq!(
            ConfigError::InvalidSweepInterval.as_str(),
            "InvalidSweepInterval"
        );
    }

    #[test]
    fn test_store_error_status_codes() {
        assert_eq!(
            StoreError::Unavailable("down".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            StoreError::Backend("bad".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
