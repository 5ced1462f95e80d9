use crate::{domain::requests::product::FindAllProducts, model::Product as ProductModel};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;
use uuid::Uuid;

pub type DynProductQueryRepository = Arc<dyn ProductQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait ProductQueryRepositoryTrait {
    async fn find_all(
        &self,
        store_id: &str,
        req: &FindAllProducts,
    ) -> Result<(Vec<ProductModel>, i64), RepositoryError>;
    async fn find_by_id(
        &self,
        store_id: &str,
        id: Uuid,
    ) -> Result<Option<ProductModel>, RepositoryError>;
    /// Active product whose primary barcode matches.
    async fn find_active_by_barcode(
        &self,
        store_id: &str,
        barcode: &str,
    ) -> Result<Option<ProductModel>, RepositoryError>;
    /// Active product carrying `barcode` on one of its units.
    async fn find_active_by_unit_barcode(
        &self,
        store_id: &str,
        barcode: &str,
    ) -> Result<Option<ProductModel>, RepositoryError>;
    async fn find_low_stock(&self, store_id: &str) -> Result<Vec<ProductModel>, RepositoryError>;
    /// Every primary and unit barcode in the store, optionally ignoring one product.
    async fn find_known_barcodes(
        &self,
        store_id: &str,
        exclude: Option<Uuid>,
    ) -> Result<Vec<String>, RepositoryError>;
    /// Unit barcodes only, optionally ignoring one product.
    async fn find_unit_barcodes(
        &self,
        store_id: &str,
        exclude: Option<Uuid>,
    ) -> Result<Vec<String>, RepositoryError>;
}
