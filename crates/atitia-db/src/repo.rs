//! Repository traits
//!
//! Define async repository interfaces for the subscription store, the
//! owner profile store, the notification store, and the compound
//! lifecycle transitions. The sweep logic is written against these
//! traits so it can run against an in-memory fake in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::*;

/// Keyset pagination window
///
/// Sweep queries page by ascending id so large subscription sets are
/// never loaded into memory in one shot.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    /// Maximum rows to return
    pub limit: i64,
    /// Resume strictly after this id, if set
    pub after_id: Option<Uuid>,
}

impl Page {
    /// First page of the given size
    pub fn first(limit: i64) -> Self {
        Self {
            limit,
            after_id: None,
        }
    }

    /// Page following the given id
    pub fn after(limit: i64, id: Uuid) -> Self {
        Self {
            limit,
            after_id: Some(id),
        }
    }
}

/// Subscription repository trait
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Find a subscription by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<SubscriptionRow>>;

    /// Find active subscriptions expiring strictly after `after` and at
    /// or before `until`
    async fn find_active_expiring(
        &self,
        after: DateTime<Utc>,
        until: DateTime<Utc>,
        page: Page,
    ) -> DbResult<Vec<SubscriptionRow>>;

    /// Find active subscriptions whose end date is strictly before `now`
    async fn find_active_expired(
        &self,
        now: DateTime<Utc>,
        page: Page,
    ) -> DbResult<Vec<SubscriptionRow>>;

    /// Find all subscriptions currently in the grace period
    async fn find_in_grace_period(&self, page: Page) -> DbResult<Vec<SubscriptionRow>>;
}

/// Owner profile repository trait
///
/// The sweep only reads profiles directly; mirror writes happen inside
/// the lifecycle transactions.
#[async_trait]
pub trait OwnerProfileRepository: Send + Sync {
    /// Find an owner profile by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<OwnerProfileRow>>;
}

/// Notification repository trait
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Append a notification; each write is a full document set
    async fn create(&self, notification: CreateNotification) -> DbResult<()>;

    /// List notifications for a user, newest first
    async fn find_by_user_id(&self, user_id: Uuid, limit: i64) -> DbResult<Vec<NotificationRow>>;
}

/// Create notification input
#[derive(Debug, Clone)]
pub struct CreateNotification {
    /// Composite `{owner}_{millis}_{type}` id
    pub id: String,
    pub user_id: Uuid,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle repository trait
///
/// Compound transitions touch the subscription, the owner profile
/// mirror, and the notification feed. Implementations must apply each
/// transition atomically: either all three writes commit or none do.
#[async_trait]
pub trait LifecycleRepository: Send + Sync {
    /// Move an expired subscription into the grace period
    async fn begin_grace_period(&self, transition: GraceTransition) -> DbResult<()>;

    /// Downgrade a subscription whose grace period has elapsed
    async fn downgrade(&self, transition: DowngradeTransition) -> DbResult<()>;
}

/// Grace period transition input
#[derive(Debug, Clone)]
pub struct GraceTransition {
    pub subscription_id: Uuid,
    pub owner_id: Uuid,
    /// Grace-period-start notification written in the same transaction
    pub notification: CreateNotification,
}

/// Downgrade transition input
#[derive(Debug, Clone)]
pub struct DowngradeTransition {
    pub subscription_id: Uuid,
    pub owner_id: Uuid,
    /// Tier the owner profile falls back to
    pub baseline_tier: String,
    pub cancellation_reason: String,
    pub cancelled_at: DateTime<Utc>,
    /// Downgrade notification written in the same transaction
    pub notification: CreateNotification,
}

/// Sweep lease repository trait
///
/// A named lease with a TTL guards against overlapping sweep
/// invocations racing on the same subscriptions.
#[async_trait]
pub trait SweepLeaseRepository: Send + Sync {
    /// Try to acquire the named lease; returns false if another holder
    /// has it and the lease has not yet expired
    async fn try_acquire(&self, name: &str, holder: Uuid, ttl_secs: i64) -> DbResult<bool>;

    /// Release the named lease if held by this holder
    async fn release(&self, name: &str, holder: Uuid) -> DbResult<()>;
}
