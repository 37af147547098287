//! PostgreSQL repository implementations

mod lease;
mod lifecycle;
mod notification;
mod owner_profile;
mod subscription;

pub use lease::PgSweepLeaseRepository;
pub use lifecycle::PgLifecycleRepository;
pub use notification::PgNotificationRepository;
pub use owner_profile::PgOwnerProfileRepository;
pub use subscription::PgSubscriptionRepository;

use crate::DbPool;

/// All repositories bundled together
#[derive(Clone)]
pub struct Repositories {
    pub subscriptions: PgSubscriptionRepository,
    pub owner_profiles: PgOwnerProfileRepository,
    pub notifications: PgNotificationRepository,
    pub lifecycle: PgLifecycleRepository,
    pub leases: PgSweepLeaseRepository,
}

impl Repositories {
    /// Create all repositories from a database pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            subscriptions: PgSubscriptionRepository::new(pool.clone()),
            owner_profiles: PgOwnerProfileRepository::new(pool.clone()),
            notifications: PgNotificationRepository::new(pool.clone()),
            lifecycle: PgLifecycleRepository::new(pool.clone()),
            leases: PgSweepLeaseRepository::new(pool),
        }
    }
}
