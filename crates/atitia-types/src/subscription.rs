//! Subscription types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{OwnerId, Tier};

/// Unique subscription identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub Uuid);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Subscription status
///
/// Sweep-driven transitions only ever move forward
/// (active -> gracePeriod -> expired); a reversal requires an
/// external renewal purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubscriptionStatus {
    /// Subscription is active
    Active,
    /// Expired but within the renewal grace window
    GracePeriod,
    /// Grace window elapsed without renewal
    Expired,
    /// Cancelled by the owner
    Cancelled,
}

impl SubscriptionStatus {
    /// Wire/storage form of the status
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::GracePeriod => "gracePeriod",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubscriptionStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "gracePeriod" => Ok(Self::GracePeriod),
            "expired" => Ok(Self::Expired),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(StatusParseError(s.to_string())),
        }
    }
}

/// Error parsing a subscription status string
#[derive(Debug, Clone)]
pub struct StatusParseError(pub String);

impl std::fmt::Display for StatusParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid subscription status: {}", self.0)
    }
}

impl std::error::Error for StatusParseError {}

/// Owner subscription
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Subscription ID
    pub id: SubscriptionId,
    /// Owner who holds the subscription
    pub owner_id: OwnerId,
    /// Current tier
    pub tier: Tier,
    /// Subscription status
    pub status: SubscriptionStatus,
    /// Expiry timestamp
    pub end_date: DateTime<Utc>,
    /// Whether the subscription renews automatically
    pub auto_renew: bool,
    /// Why the subscription was cancelled, if it was
    pub cancellation_reason: Option<String>,
    /// When the subscription was cancelled, if it was
    pub cancelled_at: Option<DateTime<Utc>>,
    /// When the subscription was created
    pub created_at: DateTime<Utc>,
}
