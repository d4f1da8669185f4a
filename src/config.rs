//! Server configuration.

use clap::Parser;

use crate::error::ConfigError;
use crate::retention::RetentionPolicy;

/// Default admin service port.
pub const DEFAULT_ADMIN_PORT: u16 = 7070;

/// Default grace period before soft-deleted records are erased, in hours.
pub const DEFAULT_RETENTION_HOURS: i64 = 720;

/// Default interval between scheduled sweeps, in hours.
pub const DEFAULT_SWEEP_INTERVAL_HOURS: i64 = 24;

/// Command-line arguments for the server.
#[derive(Parser, Debug, Clone)]
#[command(name = "custodian")]
#[command(about = "Retention and garbage-collection service for soft-deleted workspace records")]
#[command(version)]
pub struct Args {
    /// Host address to bind to.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port for the admin service.
    #[arg(long, default_value_t = DEFAULT_ADMIN_PORT)]
    pub port: u16,

    /// Grace period before soft-deleted records are erased, in hours.
    #[arg(long, default_value_t = DEFAULT_RETENTION_HOURS)]
    pub retention_hours: i64,

    /// Interval between scheduled sweeps, in hours.
    #[arg(long, default_value_t = DEFAULT_SWEEP_INTERVAL_HOURS)]
    pub sweep_interval_hours: i64,

    /// Arm the sweep timer at startup instead of waiting for an admin
    /// start request.
    #[arg(long)]
    pub autostart: bool,

    /// Enable debug logging.
    #[arg(long, short = 'd')]
    pub debug: bool,

    /// Enable silent mode (minimal logging).
    #[arg(long, short = 's')]
    pub silent: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_ADMIN_PORT,
            retention_hours: DEFAULT_RETENTION_HOURS,
            sweep_interval_hours: DEFAULT_SWEEP_INTERVAL_HOURS,
            autostart: false,
            debug: false,
            silent: false,
        }
    }
}

/// Server configuration derived from command-line arguments.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host address to bind to.
    pub host: String,
    /// Port for the admin service.
    pub port: u16,
    /// Grace period before soft-deleted records are erased, in hours.
    pub retention_hours: i64,
    /// Interval between scheduled sweeps, in hours.
    pub sweep_interval_hours: i64,
    /// Arm the sweep timer at startup.
    pub autostart: bool,
    /// Enable debug logging.
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_ADMIN_PORT,
            retention_hours: DEFAULT_RETENTION_HOURS,
            sweep_interval_hours: DEFAULT_SWEEP_INTERVAL_HOURS,
            autostart: false,
            debug: false,
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            retention_hours: args.retention_hours,
            sweep_interval_hours: args.sweep_interval_hours,
            autostart: args.autostart,
            debug: args.debug,
        }
    }
}

impl Config {
    /// Returns the bind address for the admin service.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Builds the initial retention policy from the configured hours.
    pub fn policy(&self) -> Result<RetentionPolicy, ConfigError> {
        RetentionPolicy::from_hours(self.retention_hours, self.sweep_interval_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.bind_address(), "127.0.0.1:7070");
        assert_eq!(config.retention_hours, 720);
        assert_eq!(config.sweep_interval_hours, 24);
        assert!(!config.autostart);
    }

    #[test]
    fn test_policy_from_config() {
        let config = Config {
            retention_hours: 48,
            sweep_interval_hours: 6,
            ..Config::default()
        };
        let policy = config.policy().unwrap();
        assert_eq!(policy.retention_period, Duration::hours(48));
        assert_eq!(policy.sweep_interval, Duration::hours(6));
    }

    #[test]
    fn test_policy_rejects_zero_hours() {
        let config = Config {
            retention_hours: 0,
            ..Config::default()
        };
        assert!(config.policy().is_err());
    }
}
