//! Sweep configuration

use atitia_types::Tier;

use crate::SweepError;

/// Default reminder lead times in days before expiry
pub const DEFAULT_REMINDER_LEAD_DAYS: [i64; 3] = [7, 3, 1];

/// Default grace period length in days
pub const DEFAULT_GRACE_PERIOD_DAYS: i64 = 7;

/// Sweep configuration
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Reminder lead times in days before expiry, strictly descending
    pub reminder_lead_days: Vec<i64>,
    /// Grace period length in days
    pub grace_period_days: i64,
    /// Tier owners fall back to on downgrade
    pub baseline_tier: Tier,
    /// Maximum rows fetched per repository query
    pub batch_size: i64,
}

impl SweepConfig {
    /// Create a config with the default lead times and grace period
    pub fn new() -> Self {
        Self {
            reminder_lead_days: DEFAULT_REMINDER_LEAD_DAYS.to_vec(),
            grace_period_days: DEFAULT_GRACE_PERIOD_DAYS,
            baseline_tier: Tier::baseline(),
            batch_size: 100,
        }
    }

    /// Set the reminder lead times
    pub fn with_reminder_lead_days(mut self, days: Vec<i64>) -> Self {
        self.reminder_lead_days = days;
        self
    }

    /// Set the grace period length
    pub fn with_grace_period_days(mut self, days: i64) -> Self {
        self.grace_period_days = days;
        self
    }

    /// Set the query batch size
    pub fn with_batch_size(mut self, batch_size: i64) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Validate the configuration
    ///
    /// Lead times must be positive and strictly descending so the
    /// reminder windows partition cleanly into disjoint buckets.
    pub fn validate(&self) -> Result<(), SweepError> {
        if self.reminder_lead_days.is_empty() {
            return Err(SweepError::InvalidConfig(
                "reminder lead days must not be empty".to_string(),
            ));
        }
        for window in self.reminder_lead_days.windows(2) {
            if window[0] <= window[1] {
                return Err(SweepError::InvalidConfig(format!(
                    "reminder lead days must be strictly descending, got {:?}",
                    self.reminder_lead_days
                )));
            }
        }
        if let Some(&last) = self.reminder_lead_days.last() {
            if last <= 0 {
                return Err(SweepError::InvalidConfig(
                    "reminder lead days must be positive".to_string(),
                ));
            }
        }
        if self.grace_period_days <= 0 {
            return Err(SweepError::InvalidConfig(
                "grace period must be positive".to_string(),
            ));
        }
        if self.batch_size <= 0 {
            return Err(SweepError::InvalidConfig(
                "batch size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SweepConfig::default().validate().is_ok());
    }

    #[test]
    fn ascending_lead_days_are_rejected() {
        let config = SweepConfig::new().with_reminder_lead_days(vec![1, 3, 7]);
        assert!(config.validate().unwrap_err().is_config());
    }

    #[test]
    fn duplicate_lead_days_are_rejected() {
        let config = SweepConfig::new().with_reminder_lead_days(vec![7, 3, 3]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_positive_values_are_rejected() {
        assert!(SweepConfig::new()
            .with_reminder_lead_days(vec![3, 0])
            .validate()
            .is_err());
        assert!(SweepConfig::new()
            .with_grace_period_days(0)
            .validate()
            .is_err());
        assert!(SweepConfig::new().with_batch_size(0).validate().is_err());
    }
}
