//! Retention policy values.

use chrono::Duration;

use crate::error::ConfigError;

/// Global retention policy applied to every entity type.
///
/// Mutable at runtime through the scheduler: a retention-period change takes
/// effect on the next cutoff computation, an interval change on the next
/// scheduling cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Grace period between soft deletion and permanent erasure.
    pub retention_period: Duration,
    /// Interval between scheduled sweeps.
    pub sweep_interval: Duration,
}

impl RetentionPolicy {
    pub fn new(retention_period: Duration, sweep_interval: Duration) -> Result<Self, ConfigError> {
        validate_retention_period(retention_period)?;
        validate_sweep_interval(sweep_interval)?;
        Ok(Self {
            retention_period,
            sweep_interval,
        })
    }

    pub fn from_hours(retention_hours: i64, sweep_interval_hours: i64) -> Result<Self, ConfigError> {
        Self::new(
            Duration::hours(retention_hours),
            Duration::hours(sweep_interval_hours),
        )
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            retention_period: Duration::days(30),
            sweep_interval: Duration::hours(24),
        }
    }
}

pub(crate) fn validate_retention_period(period: Duration) -> Result<(), ConfigError> {
    if period <= Duration::zero() {
        return Err(ConfigError::InvalidRetentionPeriod);
    }
    Ok(())
}

pub(crate) fn validate_sweep_interval(interval: Duration) -> Result<(), ConfigError> {
    if interval <= Duration::zero() {
        return Err(ConfigError::InvalidSweepInterval);
    }
    Ok(())
}
