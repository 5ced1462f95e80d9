use crate::{
    domain::response::{
        api::ApiResponse,
        store_account::{PaymentResponse, StoreAccountResponse},
    },
    model::StoreAccount as StoreAccountModel,
};
use async_trait::async_trait;
use shared::errors::{RepositoryError, ServiceError};
use std::sync::Arc;

pub type DynStoreAccountRepository = Arc<dyn StoreAccountRepositoryTrait + Send + Sync>;
pub type DynStoreAccountService = Arc<dyn StoreAccountServiceTrait + Send + Sync>;

#[async_trait]
pub trait StoreAccountRepositoryTrait {
    async fn find_by_store_id(
        &self,
        store_id: &str,
    ) -> Result<Option<StoreAccountModel>, RepositoryError>;

    /// Writes `account` only if the stored version still equals
    /// `expected_version`, and in the same transaction sets the store's
    /// `is_active` flag when `store_active` is given.
    ///
    /// A version mismatch yields `RepositoryError::Conflict`.
    async fn save(
        &self,
        account: &StoreAccountModel,
        expected_version: i64,
        store_active: Option<bool>,
    ) -> Result<StoreAccountModel, RepositoryError>;
}

#[async_trait]
pub trait StoreAccountServiceTrait {
    async fn get_account(
        &self,
        store_id: &str,
    ) -> Result<ApiResponse<StoreAccountResponse>, ServiceError>;
    async fn record_payment(
        &self,
        store_id: &str,
        amount: f64,
    ) -> Result<ApiResponse<PaymentResponse>, ServiceError>;
    async fn update_threshold(
        &self,
        store_id: &str,
        threshold: f64,
    ) -> Result<ApiResponse<StoreAccountResponse>, ServiceError>;
    async fn set_paused(
        &self,
        store_id: &str,
        is_paused: bool,
        reason: Option<&str>,
    ) -> Result<ApiResponse<StoreAccountResponse>, ServiceError>;
}
