//! Atitia Sweep Core - Subscription lifecycle sweep logic
//!
//! The sweep runs once per day and walks owner subscriptions in three
//! passes:
//! 1. Renewal reminders ahead of expiry (7/3/1 day lead times)
//! 2. Expired active subscriptions move into a grace period
//! 3. Subscriptions past the grace period are downgraded to Free
//!
//! # Example
//!
//! ```rust,ignore
//! use atitia_sweep_core::{SweepConfig, SweepService};
//! use chrono::Utc;
//!
//! let service = SweepService::new(
//!     SweepConfig::default(),
//!     repos.subscriptions,
//!     repos.owner_profiles,
//!     repos.notifications,
//!     repos.lifecycle,
//! )?;
//!
//! let summary = service.run(Utc::now()).await?;
//! println!("reminders sent: {}", summary.reminders_sent);
//! ```

pub mod config;
pub mod error;
pub mod messages;
pub mod service;

pub use config::SweepConfig;
pub use error::SweepError;
pub use service::{SweepService, SweepSummary};
