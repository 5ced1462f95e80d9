use crate::{
    abstract_trait::store_account::StoreAccountRepositoryTrait,
    model::StoreAccount as StoreAccountModel,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct StoreAccountRepository {
    db: ConnectionPool,
}

impl StoreAccountRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StoreAccountRepositoryTrait for StoreAccountRepository {
    async fn find_by_store_id(
        &self,
        store_id: &str,
    ) -> Result<Option<StoreAccountModel>, RepositoryError> {
        let account = sqlx::query_as::<_, StoreAccountModel>(
            "SELECT * FROM store_accounts WHERE store_id = $1",
        )
        .bind(store_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch store account {store_id}: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok(account)
    }

    async fn save(
        &self,
        account: &StoreAccountModel,
        expected_version: i64,
        store_active: Option<bool>,
    ) -> Result<StoreAccountModel, RepositoryError> {
        let mut tx = self.db.begin().await?;

        let saved = sqlx::query_as::<_, StoreAccountModel>(
            r#"
            UPDATE store_accounts
            SET total_paid = $2,
                due_balance = $3,
                threshold = $4,
                is_paused = $5,
                paused_at = $6,
                paused_reason = $7,
                last_payment_date = $8,
                last_payment_amount = $9,
                version = version + 1,
                updated_at = now()
            WHERE store_id = $1 AND version = $10
            RETURNING *
            "#,
        )
        .bind(&account.store_id)
        .bind(account.total_paid)
        .bind(account.due_balance)
        .bind(account.threshold)
        .bind(account.is_paused)
        .bind(account.paused_at)
        .bind(&account.paused_reason)
        .bind(account.last_payment_date)
        .bind(account.last_payment_amount)
        .bind(expected_version)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(saved) = saved else {
            warn!(
                "⚠️ Store account {} changed since version {expected_version}",
                account.store_id
            );
            return Err(RepositoryError::Conflict(format!(
                "Store account {} was modified concurrently",
                account.store_id
            )));
        };

        if let Some(is_active) = store_active {
            let result =
                sqlx::query("UPDATE stores SET is_active = $2, updated_at = now() WHERE id = $1")
                    .bind(&account.store_id)
                    .bind(is_active)
                    .execute(&mut *tx)
                    .await?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::NotFound);
            }
        }

        tx.commit().await?;

        info!(
            "💾 Saved store account {} (version {})",
            saved.store_id, saved.version
        );
        Ok(saved)
    }
}
