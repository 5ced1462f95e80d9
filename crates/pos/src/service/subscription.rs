use crate::{
    abstract_trait::store::{DynStoreRepository, DynSubscriptionService, SubscriptionServiceTrait},
    domain::response::{
        api::ApiResponse,
        store::{StoreResponse, SubscriptionStatusResponse},
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use prometheus_client::registry::Registry;
use shared::{
    errors::ServiceError,
    utils::{Metrics, Status},
};
use std::time::Duration;
use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct SubscriptionService {
    pub store: DynStoreRepository,
    pub metrics: Metrics,
}

impl SubscriptionService {
    pub fn new(store: DynStoreRepository, registry: &mut Registry) -> Self {
        let metrics = Metrics::new();
        metrics.register("subscription_service", registry);

        Self { store, metrics }
    }

    fn record(&self, operation: &str, start: Instant, status: Status) {
        self.metrics
            .record(operation, status, start.elapsed().as_secs_f64());
    }
}

#[async_trait]
impl SubscriptionServiceTrait for SubscriptionService {
    async fn check_subscription(
        &self,
        store_id: &str,
    ) -> Result<SubscriptionStatusResponse, ServiceError> {
        let start = Instant::now();
        let store_id = store_id.to_lowercase();

        let store = match self.store.find_by_id(&store_id).await {
            Ok(Some(store)) => store,
            Ok(None) => {
                self.record("check_subscription", start, Status::Error);
                return Err(ServiceError::NotFound(format!("Store {store_id} not found")));
            }
            Err(e) => {
                error!("❌ Failed to load store {store_id}: {e}");
                self.record("check_subscription", start, Status::Error);
                return Err(ServiceError::Repo(e));
            }
        };

        let expired = store.is_expired_at(Utc::now());
        let mut is_active = store.is_active;

        if expired && is_active {
            if let Err(e) = self.store.deactivate(&store_id).await {
                error!("❌ Failed to deactivate expired store {store_id}: {e}");
                self.record("check_subscription", start, Status::Error);
                return Err(ServiceError::Repo(e));
            }
            info!("⏰ Subscription of store {store_id} expired, store deactivated");
            is_active = false;
        }

        self.record("check_subscription", start, Status::Success);

        Ok(SubscriptionStatusResponse {
            is_active,
            subscription_end_date: store.subscription_end_date.map(|dt| dt.to_rfc3339()),
            subscription_expired: expired,
        })
    }

    async fn reactivate(
        &self,
        store_id: &str,
        new_end_date: Option<DateTime<Utc>>,
    ) -> Result<ApiResponse<StoreResponse>, ServiceError> {
        let start = Instant::now();
        let store_id = store_id.to_lowercase();

        let store = match self
            .store
            .reactivate(&store_id, new_end_date, Utc::now())
            .await
        {
            Ok(Some(store)) => store,
            Ok(None) => {
                self.record("reactivate", start, Status::Error);
                return Err(ServiceError::NotFound(format!("Store {store_id} not found")));
            }
            Err(e) => {
                error!("❌ Failed to reactivate store {store_id}: {e}");
                self.record("reactivate", start, Status::Error);
                return Err(ServiceError::Repo(e));
            }
        };

        info!(
            "✅ Store {store_id} reactivated until {:?}",
            store.subscription_end_date
        );
        self.record("reactivate", start, Status::Success);

        Ok(ApiResponse::success(
            "Store reactivated successfully",
            StoreResponse::from(store),
        ))
    }

    async fn sweep_expired(&self) -> Result<u64, ServiceError> {
        let start = Instant::now();

        match self.store.deactivate_expired(Utc::now()).await {
            Ok(count) => {
                if count > 0 {
                    info!("⏰ Deactivated {count} stores with expired subscriptions");
                }
                self.record("sweep_expired", start, Status::Success);
                Ok(count)
            }
            Err(e) => {
                error!("❌ Subscription sweep failed: {e}");
                self.record("sweep_expired", start, Status::Error);
                Err(ServiceError::Repo(e))
            }
        }
    }
}

/// Runs `sweep_expired` every `every`, starting one interval after spawn.
pub fn spawn_expiry_sweep(service: DynSubscriptionService, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + every, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(e) = service.sweep_expired().await {
                warn!("⚠️ Scheduled subscription sweep failed: {e}");
            }
        }
    })
}
