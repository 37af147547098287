//! PostgreSQL subscription repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::SubscriptionRow;
use crate::repo::{Page, SubscriptionRepository};

/// PostgreSQL subscription repository
#[derive(Clone)]
pub struct PgSubscriptionRepository {
    pool: PgPool,
}

impl PgSubscriptionRepository {
    /// Create a new subscription repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<SubscriptionRow>> {
        let sub = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, owner_id, tier, status, end_date, auto_renew,
                   cancellation_reason, cancelled_at, created_at, updated_at
            FROM owner_subscriptions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sub)
    }

    async fn find_active_expiring(
        &self,
        after: DateTime<Utc>,
        until: DateTime<Utc>,
        page: Page,
    ) -> DbResult<Vec<SubscriptionRow>> {
        let subs = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, owner_id, tier, status, end_date, auto_renew,
                   cancellation_reason, cancelled_at, created_at, updated_at
            FROM owner_subscriptions
            WHERE status = 'active'
              AND end_date > $1
              AND end_date <= $2
              AND ($3::uuid IS NULL OR id > $3)
            ORDER BY id
            LIMIT $4
            "#,
        )
        .bind(after)
        .bind(until)
        .bind(page.after_id)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(subs)
    }

    async fn find_active_expired(
        &self,
        now: DateTime<Utc>,
        page: Page,
    ) -> DbResult<Vec<SubscriptionRow>> {
        let subs = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, owner_id, tier, status, end_date, auto_renew,
                   cancellation_reason, cancelled_at, created_at, updated_at
            FROM owner_subscriptions
            WHERE status = 'active'
              AND end_date < $1
              AND ($2::uuid IS NULL OR id > $2)
            ORDER BY id
            LIMIT $3
            "#,
        )
        .bind(now)
        .bind(page.after_id)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(subs)
    }

    async fn find_in_grace_period(&self, page: Page) -> DbResult<Vec<SubscriptionRow>> {
        let subs = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, owner_id, tier, status, end_date, auto_renew,
                   cancellation_reason, cancelled_at, created_at, updated_at
            FROM owner_subscriptions
            WHERE status = 'gracePeriod'
              AND ($1::uuid IS NULL OR id > $1)
            ORDER BY id
            LIMIT $2
            "#,
        )
        .bind(page.after_id)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(subs)
    }
}
