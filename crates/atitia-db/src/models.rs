//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.
//! Tier and status columns are stored as strings; domain enums live in
//! atitia-types.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Subscription row from the database
#[derive(Debug, Clone, FromRow)]
pub struct SubscriptionRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub tier: String,
    pub status: String,
    pub end_date: DateTime<Utc>,
    pub auto_renew: bool,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Owner profile row from the database
#[derive(Debug, Clone, FromRow)]
pub struct OwnerProfileRow {
    pub id: Uuid,
    pub display_name: String,
    pub subscription_tier: String,
    pub subscription_status: String,
    /// Cleared (set to NULL) when the owner is downgraded
    pub subscription_end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Notification row from the database
///
/// The primary key is the composite `{owner}_{millis}_{type}` string,
/// not a UUID.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationRow {
    pub id: String,
    pub user_id: Uuid,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub title: String,
    pub body: String,
    pub data: serde_json::Value,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

// Conversion implementations from row types to atitia-types domain ids

impl SubscriptionRow {
    /// Convert to domain SubscriptionId
    pub fn subscription_id(&self) -> atitia_types::SubscriptionId {
        atitia_types::SubscriptionId(self.id)
    }

    /// Convert to domain OwnerId
    pub fn owner_id(&self) -> atitia_types::OwnerId {
        atitia_types::OwnerId(self.owner_id)
    }
}

impl OwnerProfileRow {
    /// Convert to domain OwnerId
    pub fn owner_id(&self) -> atitia_types::OwnerId {
        atitia_types::OwnerId(self.id)
    }
}
