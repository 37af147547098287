//! PostgreSQL lifecycle transition implementation
//!
//! The expiry and grace-expiry transitions touch three tables
//! (subscription, owner profile mirror, notification feed). Each
//! transition runs inside one transaction so a partial failure can
//! never leave the subscription and the profile mirror disagreeing.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::DbResult;
use crate::repo::{CreateNotification, DowngradeTransition, GraceTransition, LifecycleRepository};

/// PostgreSQL lifecycle repository
#[derive(Clone)]
pub struct PgLifecycleRepository {
    pool: PgPool,
}

impl PgLifecycleRepository {
    /// Create a new lifecycle repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn insert_notification(
    tx: &mut sqlx::PgTransaction<'_>,
    notification: &CreateNotification,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO notifications (id, user_id, type, title, body, data, read, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7)
        "#,
    )
    .bind(&notification.id)
    .bind(notification.user_id)
    .bind(&notification.kind)
    .bind(&notification.title)
    .bind(&notification.body)
    .bind(&notification.data)
    .bind(notification.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[async_trait]
impl LifecycleRepository for PgLifecycleRepository {
    async fn begin_grace_period(&self, transition: GraceTransition) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE owner_subscriptions
            SET status = 'gracePeriod', updated_at = NOW()
            WHERE id = $1 AND status = 'active'
            "#,
        )
        .bind(transition.subscription_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE owner_profiles
            SET subscription_status = 'gracePeriod', updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(transition.owner_id)
        .execute(&mut *tx)
        .await?;

        insert_notification(&mut tx, &transition.notification).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn downgrade(&self, transition: DowngradeTransition) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE owner_subscriptions
            SET status = 'expired',
                auto_renew = FALSE,
                cancellation_reason = $1,
                cancelled_at = $2,
                updated_at = NOW()
            WHERE id = $3 AND status = 'gracePeriod'
            "#,
        )
        .bind(&transition.cancellation_reason)
        .bind(transition.cancelled_at)
        .bind(transition.subscription_id)
        .execute(&mut *tx)
        .await?;

        // A downgraded owner has no expiry any more; the end-date
        // mirror is cleared, not left at the stale value.
        sqlx::query(
            r#"
            UPDATE owner_profiles
            SET subscription_tier = $1,
                subscription_status = 'expired',
                subscription_end_date = NULL,
                updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(&transition.baseline_tier)
        .bind(transition.owner_id)
        .execute(&mut *tx)
        .await?;

        insert_notification(&mut tx, &transition.notification).await?;

        tx.commit().await?;
        Ok(())
    }
}
