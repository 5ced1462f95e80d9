use crate::model::{Product as ProductModel, ProductDraft};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;
use uuid::Uuid;

pub type DynProductCommandRepository = Arc<dyn ProductCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait ProductCommandRepositoryTrait {
    /// Fails with `AlreadyExists` when `(store_id, barcode)` is taken.
    async fn create_product(&self, draft: &ProductDraft) -> Result<ProductModel, RepositoryError>;
    async fn update_product(
        &self,
        id: Uuid,
        draft: &ProductDraft,
    ) -> Result<ProductModel, RepositoryError>;
    /// Returns the deleted row.
    async fn delete_product(&self, store_id: &str, id: Uuid)
    -> Result<ProductModel, RepositoryError>;
}
