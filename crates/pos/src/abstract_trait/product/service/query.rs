use crate::domain::{
    requests::product::FindAllProducts,
    response::{
        api::{ApiResponse, ApiResponsePagination},
        product::ProductResponse,
    },
};
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;
use uuid::Uuid;

pub type DynProductQueryService = Arc<dyn ProductQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait ProductQueryServiceTrait {
    async fn find_all(
        &self,
        store_id: &str,
        req: &FindAllProducts,
    ) -> Result<ApiResponsePagination<Vec<ProductResponse>>, ServiceError>;
    async fn find_by_id(
        &self,
        store_id: &str,
        id: Uuid,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError>;
    async fn lookup_barcode(
        &self,
        store_id: &str,
        barcode: &str,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError>;
    async fn find_low_stock(
        &self,
        store_id: &str,
    ) -> Result<ApiResponse<Vec<ProductResponse>>, ServiceError>;
}
