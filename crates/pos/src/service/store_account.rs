use crate::{
    abstract_trait::store_account::{DynStoreAccountRepository, StoreAccountServiceTrait},
    domain::response::{
        api::ApiResponse,
        store_account::{PaymentResponse, StoreAccountResponse},
    },
    model::StoreAccount as StoreAccountModel,
};
use async_trait::async_trait;
use chrono::Utc;
use prometheus_client::registry::Registry;
use shared::{
    errors::{RepositoryError, ServiceError},
    utils::{Metrics, Status},
};
use tokio::time::Instant;
use tracing::{error, info, warn};

pub const MAX_SAVE_ATTEMPTS: usize = 3;

/// Admin-side billing gate: a store whose account is paused is also inactive.
///
/// Each mutation loads the account, applies a pure transition and saves it
/// conditionally on the loaded version, retrying on a lost race.
#[derive(Clone)]
pub struct StoreAccountService {
    pub repository: DynStoreAccountRepository,
    pub metrics: Metrics,
}

impl StoreAccountService {
    pub fn new(repository: DynStoreAccountRepository, registry: &mut Registry) -> Self {
        let metrics = Metrics::new();
        metrics.register("store_account_service", registry);

        Self {
            repository,
            metrics,
        }
    }

    /// `transition` mutates the account and returns the store flag to write
    /// alongside it, plus any value the caller wants back.
    async fn mutate<T, F>(
        &self,
        store_id: &str,
        mut transition: F,
    ) -> Result<(StoreAccountModel, T), ServiceError>
    where
        F: FnMut(&mut StoreAccountModel) -> (Option<bool>, T) + Send,
        T: Send,
    {
        for attempt in 1..=MAX_SAVE_ATTEMPTS {
            let mut account = self
                .repository
                .find_by_store_id(store_id)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Store account for {store_id} not found"))
                })?;

            let expected_version = account.version;
            let (store_active, outcome) = transition(&mut account);

            match self
                .repository
                .save(&account, expected_version, store_active)
                .await
            {
                Ok(saved) => return Ok((saved, outcome)),
                Err(RepositoryError::Conflict(msg)) => {
                    warn!("⚠️ Attempt {attempt}/{MAX_SAVE_ATTEMPTS} lost a race: {msg}");
                }
                Err(RepositoryError::NotFound) => {
                    return Err(ServiceError::NotFound(format!("Store {store_id} not found")));
                }
                Err(e) => return Err(ServiceError::Repo(e)),
            }
        }

        Err(ServiceError::Repo(RepositoryError::Conflict(format!(
            "Store account {store_id} is being updated by another request"
        ))))
    }

    fn complete<T>(&self, operation: &str, start: Instant, result: &Result<T, ServiceError>) {
        let status = match result {
            Ok(_) => Status::Success,
            Err(e) => {
                error!("❌ {operation} failed: {e}");
                Status::Error
            }
        };
        self.metrics
            .record(operation, status, start.elapsed().as_secs_f64());
    }
}

#[async_trait]
impl StoreAccountServiceTrait for StoreAccountService {
    async fn get_account(
        &self,
        store_id: &str,
    ) -> Result<ApiResponse<StoreAccountResponse>, ServiceError> {
        let start = Instant::now();
        let store_id = store_id.to_lowercase();

        let result = match self.repository.find_by_store_id(&store_id).await {
            Ok(Some(account)) => Ok(account),
            Ok(None) => Err(ServiceError::NotFound(format!(
                "Store account for {store_id} not found"
            ))),
            Err(e) => Err(ServiceError::Repo(e)),
        };
        self.complete("get_account", start, &result);

        Ok(ApiResponse::success(
            "Store account retrieved successfully",
            StoreAccountResponse::from(result?),
        ))
    }

    async fn record_payment(
        &self,
        store_id: &str,
        amount: f64,
    ) -> Result<ApiResponse<PaymentResponse>, ServiceError> {
        if !(amount.is_finite() && amount > 0.0) {
            return Err(ServiceError::Validation(vec![
                "amount: Payment amount must be greater than zero".to_string(),
            ]));
        }

        let start = Instant::now();
        let store_id = store_id.to_lowercase();

        let result = self
            .mutate(&store_id, |account| {
                let outcome = account.apply_payment(amount, Utc::now());
                (outcome.unpaused.then_some(true), outcome)
            })
            .await;
        self.complete("record_payment", start, &result);

        let (account, outcome) = result?;
        info!(
            "💰 Store {store_id} paid {amount} (applied {}), due now {}",
            outcome.applied, account.due_balance
        );
        if outcome.unpaused {
            info!("▶️ Store {store_id} unpaused after payment");
        }

        Ok(ApiResponse::success(
            "Payment recorded successfully",
            PaymentResponse {
                applied: outcome.applied,
                account: StoreAccountResponse::from(account),
            },
        ))
    }

    async fn update_threshold(
        &self,
        store_id: &str,
        threshold: f64,
    ) -> Result<ApiResponse<StoreAccountResponse>, ServiceError> {
        if !(threshold.is_finite() && threshold >= 0.0) {
            return Err(ServiceError::Validation(vec![
                "threshold: Threshold cannot be negative".to_string(),
            ]));
        }

        let start = Instant::now();
        let store_id = store_id.to_lowercase();

        let result = self
            .mutate(&store_id, |account| {
                let unpaused = account.update_threshold(threshold);
                (unpaused.then_some(true), unpaused)
            })
            .await;
        self.complete("update_threshold", start, &result);

        let (account, unpaused) = result?;
        if unpaused {
            info!("▶️ Store {store_id} unpaused after threshold raised to {threshold}");
        }

        Ok(ApiResponse::success(
            "Threshold updated successfully",
            StoreAccountResponse::from(account),
        ))
    }

    async fn set_paused(
        &self,
        store_id: &str,
        is_paused: bool,
        reason: Option<&str>,
    ) -> Result<ApiResponse<StoreAccountResponse>, ServiceError> {
        let start = Instant::now();
        let store_id = store_id.to_lowercase();

        let result = self
            .mutate(&store_id, |account| {
                if is_paused {
                    account.pause(reason, Utc::now());
                } else {
                    account.unpause();
                }
                (Some(!is_paused), ())
            })
            .await;
        self.complete("set_paused", start, &result);

        let (account, ()) = result?;
        info!(
            "{} Store {store_id} {}",
            if is_paused { "⏸️" } else { "▶️" },
            if is_paused { "paused" } else { "unpaused" }
        );

        let message = if is_paused {
            "Store paused successfully"
        } else {
            "Store unpaused successfully"
        };

        Ok(ApiResponse::success(message, StoreAccountResponse::from(account)))
    }
}
