use crate::{
    domain::response::{
        api::ApiResponse,
        store::{StoreResponse, SubscriptionStatusResponse},
    },
    model::Store as StoreModel,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::errors::{RepositoryError, ServiceError};
use std::sync::Arc;

pub type DynStoreRepository = Arc<dyn StoreRepositoryTrait + Send + Sync>;
pub type DynSubscriptionService = Arc<dyn SubscriptionServiceTrait + Send + Sync>;

#[async_trait]
pub trait StoreRepositoryTrait {
    async fn find_by_id(&self, id: &str) -> Result<Option<StoreModel>, RepositoryError>;
    async fn deactivate(&self, id: &str) -> Result<(), RepositoryError>;
    /// `None` when the store does not exist.
    async fn reactivate(
        &self,
        id: &str,
        new_end_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<Option<StoreModel>, RepositoryError>;
    async fn deactivate_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError>;
}

/// Subscription state machine: Active flips to Inactive on its own once the
/// end date passes, the reverse only through `reactivate`.
#[async_trait]
pub trait SubscriptionServiceTrait {
    async fn check_subscription(
        &self,
        store_id: &str,
    ) -> Result<SubscriptionStatusResponse, ServiceError>;
    async fn reactivate(
        &self,
        store_id: &str,
        new_end_date: Option<DateTime<Utc>>,
    ) -> Result<ApiResponse<StoreResponse>, ServiceError>;
    async fn sweep_expired(&self) -> Result<u64, ServiceError>;
}
