//! Sweep errors

use thiserror::Error;

/// Sweep errors
///
/// Per-subscription failures are logged and skipped inside the sweep;
/// errors surfaced through this type abort the whole invocation so the
/// external scheduler can retry on the next run.
#[derive(Error, Debug)]
pub enum SweepError {
    /// Database error
    #[error("database error: {0}")]
    Db(#[from] atitia_db::DbError),

    /// Invalid sweep configuration
    #[error("invalid sweep configuration: {0}")]
    InvalidConfig(String),
}

impl SweepError {
    /// Check if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::InvalidConfig(_))
    }
}
