//! Mock repositories for testing
//!
//! In-memory fakes backed by DashMap, mirroring the Postgres query
//! semantics: status/date filters, ascending-id ordering, and keyset
//! pagination.

use async_trait::async_trait;
use atitia_db::{
    CreateNotification, DbError, DbResult, DowngradeTransition, GraceTransition,
    LifecycleRepository, NotificationRepository, NotificationRow, OwnerProfileRepository,
    OwnerProfileRow, Page, SubscriptionRepository, SubscriptionRow, SweepLeaseRepository,
};
use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

type SubMap = Arc<DashMap<Uuid, SubscriptionRow>>;
type ProfileMap = Arc<DashMap<Uuid, OwnerProfileRow>>;
type NotificationMap = Arc<DashMap<String, NotificationRow>>;

fn page_rows(mut rows: Vec<SubscriptionRow>, page: Page) -> Vec<SubscriptionRow> {
    rows.sort_by_key(|r| r.id);
    rows.into_iter()
        .filter(|r| page.after_id.map_or(true, |after| r.id > after))
        .take(page.limit as usize)
        .collect()
}

/// In-memory subscription repository
#[derive(Default, Clone)]
pub struct MockSubscriptionRepository {
    subs: SubMap,
}

#[async_trait]
impl SubscriptionRepository for MockSubscriptionRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<SubscriptionRow>> {
        Ok(self.subs.get(&id).map(|r| r.value().clone()))
    }

    async fn find_active_expiring(
        &self,
        after: DateTime<Utc>,
        until: DateTime<Utc>,
        page: Page,
    ) -> DbResult<Vec<SubscriptionRow>> {
        let rows = self
            .subs
            .iter()
            .filter(|r| {
                r.status == "active" && r.end_date > after && r.end_date <= until
            })
            .map(|r| r.value().clone())
            .collect();
        Ok(page_rows(rows, page))
    }

    async fn find_active_expired(
        &self,
        now: DateTime<Utc>,
        page: Page,
    ) -> DbResult<Vec<SubscriptionRow>> {
        let rows = self
            .subs
            .iter()
            .filter(|r| r.status == "active" && r.end_date < now)
            .map(|r| r.value().clone())
            .collect();
        Ok(page_rows(rows, page))
    }

    async fn find_in_grace_period(&self, page: Page) -> DbResult<Vec<SubscriptionRow>> {
        let rows = self
            .subs
            .iter()
            .filter(|r| r.status == "gracePeriod")
            .map(|r| r.value().clone())
            .collect();
        Ok(page_rows(rows, page))
    }
}

/// In-memory owner profile repository
#[derive(Default, Clone)]
pub struct MockOwnerProfileRepository {
    profiles: ProfileMap,
}

#[async_trait]
impl OwnerProfileRepository for MockOwnerProfileRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<OwnerProfileRow>> {
        Ok(self.profiles.get(&id).map(|r| r.value().clone()))
    }
}

/// In-memory notification repository
#[derive(Default, Clone)]
pub struct MockNotificationRepository {
    notifications: NotificationMap,
}

fn notification_row(n: CreateNotification) -> NotificationRow {
    NotificationRow {
        id: n.id,
        user_id: n.user_id,
        kind: n.kind,
        title: n.title,
        body: n.body,
        data: n.data,
        read: false,
        created_at: n.created_at,
    }
}

#[async_trait]
impl NotificationRepository for MockNotificationRepository {
    async fn create(&self, notification: CreateNotification) -> DbResult<()> {
        let row = notification_row(notification);
        self.notifications.insert(row.id.clone(), row);
        Ok(())
    }

    async fn find_by_user_id(&self, user_id: Uuid, limit: i64) -> DbResult<Vec<NotificationRow>> {
        let mut rows: Vec<NotificationRow> = self
            .notifications
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit as usize);
        Ok(rows)
    }
}

/// In-memory lifecycle repository sharing state with the other mocks
///
/// Transitions are applied all-or-nothing: an injected failure returns
/// before any write, matching the transactional contract.
#[derive(Clone)]
pub struct MockLifecycleRepository {
    subs: SubMap,
    profiles: ProfileMap,
    notifications: NotificationMap,
    fail_for: Arc<DashMap<Uuid, ()>>,
}

#[async_trait]
impl LifecycleRepository for MockLifecycleRepository {
    async fn begin_grace_period(&self, transition: GraceTransition) -> DbResult<()> {
        if self.fail_for.contains_key(&transition.subscription_id) {
            return Err(DbError::NotFound);
        }

        if let Some(mut sub) = self.subs.get_mut(&transition.subscription_id) {
            if sub.status == "active" {
                sub.status = "gracePeriod".to_string();
                sub.updated_at = Utc::now();
            }
        }
        if let Some(mut profile) = self.profiles.get_mut(&transition.owner_id) {
            profile.subscription_status = "gracePeriod".to_string();
            profile.updated_at = Utc::now();
        }
        let row = notification_row(transition.notification);
        self.notifications.insert(row.id.clone(), row);
        Ok(())
    }

    async fn downgrade(&self, transition: DowngradeTransition) -> DbResult<()> {
        if self.fail_for.contains_key(&transition.subscription_id) {
            return Err(DbError::NotFound);
        }

        if let Some(mut sub) = self.subs.get_mut(&transition.subscription_id) {
            if sub.status == "gracePeriod" {
                sub.status = "expired".to_string();
                sub.auto_renew = false;
                sub.cancellation_reason = Some(transition.cancellation_reason.clone());
                sub.cancelled_at = Some(transition.cancelled_at);
                sub.updated_at = Utc::now();
            }
        }
        if let Some(mut profile) = self.profiles.get_mut(&transition.owner_id) {
            profile.subscription_tier = transition.baseline_tier.clone();
            profile.subscription_status = "expired".to_string();
            profile.subscription_end_date = None;
            profile.updated_at = Utc::now();
        }
        let row = notification_row(transition.notification);
        self.notifications.insert(row.id.clone(), row);
        Ok(())
    }
}

/// In-memory sweep lease repository
#[derive(Default, Clone)]
pub struct MockSweepLeaseRepository {
    leases: Arc<DashMap<String, (Uuid, DateTime<Utc>)>>,
}

#[async_trait]
impl SweepLeaseRepository for MockSweepLeaseRepository {
    async fn try_acquire(&self, name: &str, holder: Uuid, ttl_secs: i64) -> DbResult<bool> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(ttl_secs);

        match self.leases.entry(name.to_string()) {
            Entry::Occupied(mut entry) => {
                let (current_holder, current_expiry) = *entry.get();
                if current_holder == holder || current_expiry < now {
                    entry.insert((holder, expires_at));
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            Entry::Vacant(entry) => {
                entry.insert((holder, expires_at));
                Ok(true)
            }
        }
    }

    async fn release(&self, name: &str, holder: Uuid) -> DbResult<()> {
        self.leases
            .remove_if(name, |_, (current, _)| *current == holder);
        Ok(())
    }
}

/// All mocks sharing one set of maps, plus seeding and assertion helpers
#[derive(Clone)]
pub struct MockStore {
    pub subscriptions: Arc<MockSubscriptionRepository>,
    pub owner_profiles: Arc<MockOwnerProfileRepository>,
    pub notifications: Arc<MockNotificationRepository>,
    pub lifecycle: Arc<MockLifecycleRepository>,
    #[allow(dead_code)]
    pub leases: Arc<MockSweepLeaseRepository>,
}

impl MockStore {
    pub fn new() -> Self {
        let subs: SubMap = Arc::default();
        let profiles: ProfileMap = Arc::default();
        let notifications: NotificationMap = Arc::default();

        Self {
            subscriptions: Arc::new(MockSubscriptionRepository { subs: subs.clone() }),
            owner_profiles: Arc::new(MockOwnerProfileRepository {
                profiles: profiles.clone(),
            }),
            notifications: Arc::new(MockNotificationRepository {
                notifications: notifications.clone(),
            }),
            lifecycle: Arc::new(MockLifecycleRepository {
                subs,
                profiles,
                notifications,
                fail_for: Arc::default(),
            }),
            leases: Arc::new(MockSweepLeaseRepository::default()),
        }
    }

    /// Seed a subscription and a matching owner profile
    pub fn seed(&self, sub: SubscriptionRow) {
        let profile = test_profile(&sub);
        self.owner_profiles.profiles.insert(profile.id, profile);
        self.lifecycle.subs.insert(sub.id, sub);
    }

    /// Seed a subscription without an owner profile
    #[allow(dead_code)]
    pub fn seed_orphan(&self, sub: SubscriptionRow) {
        self.lifecycle.subs.insert(sub.id, sub);
    }

    /// Make lifecycle transitions fail for the given subscription
    #[allow(dead_code)]
    pub fn fail_lifecycle_for(&self, subscription_id: Uuid) {
        self.lifecycle.fail_for.insert(subscription_id, ());
    }

    pub fn subscription(&self, id: Uuid) -> SubscriptionRow {
        self.lifecycle.subs.get(&id).unwrap().clone()
    }

    pub fn profile(&self, owner_id: Uuid) -> OwnerProfileRow {
        self.owner_profiles
            .profiles
            .get(&owner_id)
            .unwrap()
            .clone()
    }

    pub fn notifications_for(&self, owner_id: Uuid) -> Vec<NotificationRow> {
        let mut rows: Vec<NotificationRow> = self
            .notifications
            .notifications
            .iter()
            .filter(|r| r.user_id == owner_id)
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        rows
    }

    #[allow(dead_code)]
    pub fn notification_count(&self) -> usize {
        self.notifications.notifications.len()
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Build an active subscription row expiring at the given time
pub fn active_subscription(tier: &str, end_date: DateTime<Utc>) -> SubscriptionRow {
    subscription_with_status(tier, "active", end_date)
}

/// Build a grace-period subscription row that expired at the given time
pub fn grace_subscription(tier: &str, end_date: DateTime<Utc>) -> SubscriptionRow {
    subscription_with_status(tier, "gracePeriod", end_date)
}

fn subscription_with_status(tier: &str, status: &str, end_date: DateTime<Utc>) -> SubscriptionRow {
    SubscriptionRow {
        id: Uuid::new_v4(),
        owner_id: Uuid::new_v4(),
        tier: tier.to_string(),
        status: status.to_string(),
        end_date,
        auto_renew: true,
        cancellation_reason: None,
        cancelled_at: None,
        created_at: Utc::now() - Duration::days(30),
        updated_at: Utc::now() - Duration::days(30),
    }
}

fn test_profile(sub: &SubscriptionRow) -> OwnerProfileRow {
    OwnerProfileRow {
        id: sub.owner_id,
        display_name: format!("owner-{}", sub.owner_id),
        subscription_tier: sub.tier.clone(),
        subscription_status: sub.status.clone(),
        subscription_end_date: Some(sub.end_date),
        created_at: sub.created_at,
        updated_at: sub.updated_at,
    }
}
