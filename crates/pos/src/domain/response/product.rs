use crate::model::{Product as ProductModel, ProductStatus, ProductUnit, WarehouseQuantity};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ProductResponse {
    pub id: String,
    pub store_id: String,
    pub name: String,
    pub barcode: String,
    pub cost_price: f64,
    pub price: f64,
    pub stock: i32,
    pub status: ProductStatus,
    pub low_stock_alert: i32,
    pub vat_percentage: f64,
    pub vat_inclusive: bool,
    pub units: Vec<ProductUnit>,
    pub multi_warehouse_distribution: Vec<WarehouseQuantity>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ProductModel> for ProductResponse {
    fn from(value: ProductModel) -> Self {
        ProductResponse {
            id: value.id.to_string(),
            store_id: value.store_id,
            name: value.name,
            barcode: value.barcode,
            cost_price: value.cost_price,
            price: value.price,
            stock: value.stock,
            status: value.status,
            low_stock_alert: value.low_stock_alert,
            vat_percentage: value.vat_percentage,
            vat_inclusive: value.vat_inclusive,
            units: value.units.0,
            multi_warehouse_distribution: value.multi_warehouse_distribution.0,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ImportFailure {
    /// Zero-based position in the submitted batch.
    pub row: usize,
    pub barcode: String,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ImportProductsResponse {
    pub created: usize,
    pub failed: Vec<ImportFailure>,
}
