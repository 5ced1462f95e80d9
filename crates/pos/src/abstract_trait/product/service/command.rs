use crate::domain::{
    requests::{
        product::{CreateProductRequest, ImportProductsRequest, UpdateProductRequest},
        unit::CreateMultiUnitProductRequest,
    },
    response::{
        api::ApiResponse,
        product::{ImportProductsResponse, ProductResponse},
    },
};
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;
use uuid::Uuid;

pub type DynProductCommandService = Arc<dyn ProductCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait ProductCommandServiceTrait {
    async fn create_product(
        &self,
        store_id: &str,
        req: &CreateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError>;
    async fn create_multi_unit_product(
        &self,
        store_id: &str,
        req: &CreateMultiUnitProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError>;
    async fn update_product(
        &self,
        store_id: &str,
        id: Uuid,
        req: &UpdateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError>;
    async fn delete_product(&self, store_id: &str, id: Uuid) -> Result<(), ServiceError>;
    async fn import_products(
        &self,
        store_id: &str,
        req: &ImportProductsRequest,
    ) -> Result<ApiResponse<ImportProductsResponse>, ServiceError>;
}
