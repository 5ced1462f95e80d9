use crate::{abstract_trait::store::StoreRepositoryTrait, model::Store as StoreModel};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

#[derive(Clone)]
pub struct StoreRepository {
    db: ConnectionPool,
}

impl StoreRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StoreRepositoryTrait for StoreRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<StoreModel>, RepositoryError> {
        let store = sqlx::query_as::<_, StoreModel>("SELECT * FROM stores WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch store {id}: {:?}", e);
                RepositoryError::from(e)
            })?;

        Ok(store)
    }

    async fn deactivate(&self, id: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE stores SET is_active = FALSE, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!("⛔ Store {id} deactivated");
        Ok(())
    }

    async fn reactivate(
        &self,
        id: &str,
        new_end_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<Option<StoreModel>, RepositoryError> {
        let store = sqlx::query_as::<_, StoreModel>(
            r#"
            UPDATE stores
            SET is_active = TRUE,
                subscription_start_date = CASE WHEN $2::TIMESTAMPTZ IS NULL
                    THEN subscription_start_date ELSE $3 END,
                subscription_end_date = COALESCE($2, subscription_end_date),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(new_end_date)
        .bind(now)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to reactivate store {id}: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok(store)
    }

    async fn deactivate_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE stores
            SET is_active = FALSE, updated_at = now()
            WHERE is_active AND subscription_end_date < $1
            "#,
        )
        .bind(now)
        .execute(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to sweep expired stores: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok(result.rows_affected())
    }
}
