//! Configuration for the sweeper service.

use atitia_sweep_core::SweepConfig;

/// Sweeper configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database URL
    pub database_url: String,
    /// UTC hour of day the daily sweep runs at
    pub sweep_hour_utc: u32,
    /// Run a single sweep and exit instead of looping
    pub run_once: bool,
    /// Run lease time-to-live in seconds
    pub lease_ttl_secs: i64,
    /// Sweep core configuration
    pub sweep: SweepConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        // The cron-equivalent schedule: "0 9 * * *" by default
        let sweep_hour_utc: u32 = std::env::var("SWEEP_HOUR_UTC")
            .unwrap_or_else(|_| "9".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("SWEEP_HOUR_UTC"))?;
        if sweep_hour_utc >= 24 {
            return Err(ConfigError::Invalid("SWEEP_HOUR_UTC"));
        }

        let run_once = std::env::var("RUN_ONCE")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .unwrap_or(false);

        let lease_ttl_secs: i64 = std::env::var("SWEEP_LEASE_TTL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("SWEEP_LEASE_TTL_SECS"))?;

        let grace_period_days: i64 = std::env::var("GRACE_PERIOD_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("GRACE_PERIOD_DAYS"))?;

        let reminder_lead_days = std::env::var("REMINDER_LEAD_DAYS")
            .unwrap_or_else(|_| "7,3,1".to_string())
            .split(',')
            .map(|s| s.trim().parse())
            .collect::<Result<Vec<i64>, _>>()
            .map_err(|_| ConfigError::Invalid("REMINDER_LEAD_DAYS"))?;

        let batch_size: i64 = std::env::var("SWEEP_BATCH_SIZE")
            .unwrap_or_else(|_| "100".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("SWEEP_BATCH_SIZE"))?;

        let sweep = SweepConfig::new()
            .with_reminder_lead_days(reminder_lead_days)
            .with_grace_period_days(grace_period_days)
            .with_batch_size(batch_size);

        Ok(Self {
            database_url,
            sweep_hour_utc,
            run_once,
            lease_ttl_secs,
            sweep,
        })
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
