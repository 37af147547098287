//! Atitia Types - Shared domain types
//!
//! This crate contains domain types used across the Atitia backend:
//! - Subscription tiers and statuses
//! - Owner subscriptions and profile mirrors
//! - Notification records

pub mod notification;
pub mod owner;
pub mod subscription;
pub mod tier;

pub use notification::*;
pub use owner::*;
pub use subscription::*;
pub use tier::*;
