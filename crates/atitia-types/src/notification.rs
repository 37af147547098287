//! Notification types
//!
//! Notifications are append-only records addressed to a single user.
//! Each write is a full document set; records are never updated after
//! creation apart from the client flipping the read flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::OwnerId;

/// Notification type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// Renewal reminder ahead of expiry
    SubscriptionRenewalReminder,
    /// Subscription entered the grace period
    SubscriptionGracePeriod,
    /// Subscription was downgraded to the baseline tier
    SubscriptionDowngraded,
}

impl NotificationType {
    /// Wire/storage form of the type tag
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SubscriptionRenewalReminder => "subscription_renewal_reminder",
            Self::SubscriptionGracePeriod => "subscription_grace_period",
            Self::SubscriptionDowngraded => "subscription_downgraded",
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite notification identifier
///
/// Identity is derived from `(owner, timestamp, type)` so that two
/// notifications produced for the same owner in the same run can never
/// collide on the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub String);

impl NotificationId {
    /// Compose an ID from its owner, creation time, and type tag
    pub fn compose(owner_id: OwnerId, at: DateTime<Utc>, kind: NotificationType) -> Self {
        Self(format!(
            "{}_{}_{}",
            owner_id,
            at.timestamp_millis(),
            kind.as_str()
        ))
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// User-facing notification record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Composite ID
    pub id: NotificationId,
    /// Addressed user
    pub user_id: OwnerId,
    /// Type tag
    #[serde(rename = "type")]
    pub kind: NotificationType,
    /// Human-readable title
    pub title: String,
    /// Human-readable body
    pub body: String,
    /// Structured payload consumed by the client
    pub data: serde_json::Value,
    /// Read flag; notifications start unread
    pub read: bool,
    /// When the notification was created
    pub created_at: DateTime<Utc>,
}
