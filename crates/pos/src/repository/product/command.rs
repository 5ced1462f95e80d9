use crate::{
    abstract_trait::product::repository::ProductCommandRepositoryTrait,
    model::{Product as ProductModel, ProductDraft},
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use sqlx::types::Json;
use tracing::{error, info};
use uuid::Uuid;

pub struct ProductCommandRepository {
    db: ConnectionPool,
}

impl ProductCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for ProductCommandRepository {
    async fn create_product(&self, draft: &ProductDraft) -> Result<ProductModel, RepositoryError> {
        let result = sqlx::query_as::<_, ProductModel>(
            r#"
            INSERT INTO products (
                id, store_id, name, barcode, cost_price, price, stock, status,
                low_stock_alert, vat_percentage, vat_inclusive, units,
                multi_warehouse_distribution, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, now(), now())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&draft.store_id)
        .bind(&draft.name)
        .bind(&draft.barcode)
        .bind(draft.cost_price)
        .bind(draft.price)
        .bind(draft.stock)
        .bind(draft.status.as_str())
        .bind(draft.low_stock_alert)
        .bind(draft.vat_percentage)
        .bind(draft.vat_inclusive)
        .bind(Json(&draft.units))
        .bind(Json(&draft.multi_warehouse_distribution))
        .fetch_one(&self.db)
        .await
        .map_err(|err| {
            error!("❌ Failed to create product {}: {:?}", draft.barcode, err);
            RepositoryError::from_unique(
                err,
                format!("Barcode '{}' is already used in this store", draft.barcode),
            )
        })?;

        info!("✅ Created product {} ({})", result.id, result.barcode);
        Ok(result)
    }

    async fn update_product(
        &self,
        id: Uuid,
        draft: &ProductDraft,
    ) -> Result<ProductModel, RepositoryError> {
        let result = sqlx::query_as::<_, ProductModel>(
            r#"
            UPDATE products
            SET name = $3,
                barcode = $4,
                cost_price = $5,
                price = $6,
                stock = $7,
                status = $8,
                low_stock_alert = $9,
                vat_percentage = $10,
                vat_inclusive = $11,
                units = $12,
                multi_warehouse_distribution = $13,
                updated_at = now()
            WHERE id = $1 AND store_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&draft.store_id)
        .bind(&draft.name)
        .bind(&draft.barcode)
        .bind(draft.cost_price)
        .bind(draft.price)
        .bind(draft.stock)
        .bind(draft.status.as_str())
        .bind(draft.low_stock_alert)
        .bind(draft.vat_percentage)
        .bind(draft.vat_inclusive)
        .bind(Json(&draft.units))
        .bind(Json(&draft.multi_warehouse_distribution))
        .fetch_optional(&self.db)
        .await
        .map_err(|err| {
            error!("❌ Failed to update product {id}: {:?}", err);
            RepositoryError::from_unique(
                err,
                format!("Barcode '{}' is already used in this store", draft.barcode),
            )
        })?
        .ok_or(RepositoryError::NotFound)?;

        info!("🔄 Updated product {}", result.id);
        Ok(result)
    }

    async fn delete_product(
        &self,
        store_id: &str,
        id: Uuid,
    ) -> Result<ProductModel, RepositoryError> {
        let deleted = sqlx::query_as::<_, ProductModel>(
            "DELETE FROM products WHERE id = $1 AND store_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to delete product {id}: {:?}", e);
            RepositoryError::from(e)
        })?
        .ok_or(RepositoryError::NotFound)?;

        info!("🗑️ Deleted product {id}");
        Ok(deleted)
    }
}
