use crate::{
    abstract_trait::product::repository::ProductQueryRepositoryTrait,
    domain::requests::product::FindAllProducts, model::Product as ProductModel,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use sqlx::{FromRow, Row};
use tracing::{error, info};
use uuid::Uuid;

const PRODUCT_COLUMNS: &str = "id, store_id, name, barcode, cost_price, price, stock, status, \
     low_stock_alert, vat_percentage, vat_inclusive, units, multi_warehouse_distribution, \
     created_at, updated_at";

#[derive(Clone)]
pub struct ProductQueryRepository {
    db: ConnectionPool,
}

impl ProductQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for ProductQueryRepository {
    async fn find_all(
        &self,
        store_id: &str,
        req: &FindAllProducts,
    ) -> Result<(Vec<ProductModel>, i64), RepositoryError> {
        info!(
            "🔍 Fetching products for store {store_id} with search: {:?}",
            req.search
        );

        let limit = i64::from(req.page_size);
        let offset = (i64::from(req.page) - 1).max(0) * limit;

        let search_pattern = if req.search.trim().is_empty() {
            None
        } else {
            Some(req.search.trim())
        };

        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS}, COUNT(*) OVER() AS total_count
            FROM products
            WHERE store_id = $1
              AND ($2::TEXT IS NULL OR name ILIKE '%' || $2 || '%' OR barcode ILIKE '%' || $2 || '%')
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(store_id)
            .bind(search_pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch products: {:?}", e);
                RepositoryError::from(e)
            })?;

        let total = match rows.first() {
            Some(row) => row.try_get::<i64, _>("total_count")?,
            None => 0,
        };

        let products = rows
            .iter()
            .map(ProductModel::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((products, total))
    }

    async fn find_by_id(
        &self,
        store_id: &str,
        id: Uuid,
    ) -> Result<Option<ProductModel>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 AND store_id = $2");

        let product = sqlx::query_as::<_, ProductModel>(&sql)
            .bind(id)
            .bind(store_id)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch product {id}: {:?}", e);
                RepositoryError::from(e)
            })?;

        Ok(product)
    }

    async fn find_active_by_barcode(
        &self,
        store_id: &str,
        barcode: &str,
    ) -> Result<Option<ProductModel>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE store_id = $1 AND barcode = $2 AND status = 'active'"
        );

        let product = sqlx::query_as::<_, ProductModel>(&sql)
            .bind(store_id)
            .bind(barcode)
            .fetch_optional(&self.db)
            .await?;

        Ok(product)
    }

    async fn find_active_by_unit_barcode(
        &self,
        store_id: &str,
        barcode: &str,
    ) -> Result<Option<ProductModel>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE store_id = $1 \
               AND units @> jsonb_build_array(jsonb_build_object('barcode', $2::TEXT)) \
               AND status = 'active' \
             LIMIT 1"
        );

        let product = sqlx::query_as::<_, ProductModel>(&sql)
            .bind(store_id)
            .bind(barcode)
            .fetch_optional(&self.db)
            .await?;

        Ok(product)
    }

    async fn find_low_stock(&self, store_id: &str) -> Result<Vec<ProductModel>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE store_id = $1 AND stock <= low_stock_alert \
             ORDER BY stock ASC, name ASC"
        );

        let products = sqlx::query_as::<_, ProductModel>(&sql)
            .bind(store_id)
            .fetch_all(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch low stock products: {:?}", e);
                RepositoryError::from(e)
            })?;

        info!("📉 {} low stock products in store {store_id}", products.len());
        Ok(products)
    }

    async fn find_known_barcodes(
        &self,
        store_id: &str,
        exclude: Option<Uuid>,
    ) -> Result<Vec<String>, RepositoryError> {
        let barcodes = sqlx::query_scalar::<_, String>(
            r#"
            SELECT p.barcode
            FROM products p
            WHERE p.store_id = $1 AND ($2::UUID IS NULL OR p.id <> $2)
            UNION
            SELECT u.value->>'barcode'
            FROM products p, jsonb_array_elements(p.units) AS u(value)
            WHERE p.store_id = $1
              AND ($2::UUID IS NULL OR p.id <> $2)
              AND COALESCE(u.value->>'barcode', '') <> ''
            "#,
        )
        .bind(store_id)
        .bind(exclude)
        .fetch_all(&self.db)
        .await?;

        Ok(barcodes)
    }

    async fn find_unit_barcodes(
        &self,
        store_id: &str,
        exclude: Option<Uuid>,
    ) -> Result<Vec<String>, RepositoryError> {
        let barcodes = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT u.value->>'barcode'
            FROM products p, jsonb_array_elements(p.units) AS u(value)
            WHERE p.store_id = $1
              AND ($2::UUID IS NULL OR p.id <> $2)
              AND COALESCE(u.value->>'barcode', '') <> ''
            "#,
        )
        .bind(store_id)
        .bind(exclude)
        .fetch_all(&self.db)
        .await?;

        Ok(barcodes)
    }
}
