//! PostgreSQL sweep lease repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::repo::SweepLeaseRepository;

/// PostgreSQL sweep lease repository
#[derive(Clone)]
pub struct PgSweepLeaseRepository {
    pool: PgPool,
}

impl PgSweepLeaseRepository {
    /// Create a new sweep lease repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SweepLeaseRepository for PgSweepLeaseRepository {
    async fn try_acquire(&self, name: &str, holder: Uuid, ttl_secs: i64) -> DbResult<bool> {
        // The conditional upsert succeeds when the lease is free, has
        // expired, or is being refreshed by its current holder.
        let result = sqlx::query(
            r#"
            INSERT INTO sweep_leases (name, holder, expires_at)
            VALUES ($1, $2, NOW() + make_interval(secs => $3::double precision))
            ON CONFLICT (name) DO UPDATE
            SET holder = EXCLUDED.holder, expires_at = EXCLUDED.expires_at
            WHERE sweep_leases.expires_at < NOW() OR sweep_leases.holder = $2
            "#,
        )
        .bind(name)
        .bind(holder)
        .bind(ttl_secs)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn release(&self, name: &str, holder: Uuid) -> DbResult<()> {
        sqlx::query("DELETE FROM sweep_leases WHERE name = $1 AND holder = $2")
            .bind(name)
            .bind(holder)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
