//! PostgreSQL owner profile repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::OwnerProfileRow;
use crate::repo::OwnerProfileRepository;

/// PostgreSQL owner profile repository
#[derive(Clone)]
pub struct PgOwnerProfileRepository {
    pool: PgPool,
}

impl PgOwnerProfileRepository {
    /// Create a new owner profile repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OwnerProfileRepository for PgOwnerProfileRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<OwnerProfileRow>> {
        let profile = sqlx::query_as::<_, OwnerProfileRow>(
            r#"
            SELECT id, display_name, subscription_tier, subscription_status,
                   subscription_end_date, created_at, updated_at
            FROM owner_profiles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }
}
