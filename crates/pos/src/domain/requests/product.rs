use crate::model::{ProductDraft, ProductStatus, ProductUnit, WarehouseQuantity};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub const MAX_IMPORT_ROWS: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, IntoParams)]
pub struct FindAllProducts {
    #[serde(default = "default_page")]
    pub page: i32,

    #[serde(default = "default_page_size")]
    pub page_size: i32,

    #[serde(default)]
    pub search: String,
}

fn default_page() -> i32 {
    1
}

fn default_page_size() -> i32 {
    10
}

fn default_low_stock_alert() -> i32 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProductUnitRequest {
    #[validate(length(min = 1, message = "Unit name is required"))]
    #[schema(example = "Box")]
    pub unit_name: String,

    #[validate(length(min = 1, message = "Barcode is required"))]
    #[schema(example = "8991234500012")]
    pub barcode: String,

    #[validate(range(min = 0.0, message = "Selling price cannot be negative"))]
    pub selling_price: f64,

    #[validate(range(min = 1.0, message = "Conversion factor must be at least 1"))]
    #[schema(example = 12)]
    pub conversion_factor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct WarehouseQuantityRequest {
    #[validate(length(min = 1, message = "Warehouse is required"))]
    pub warehouse_id: String,

    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Mineral Water 600ml")]
    pub name: String,

    #[validate(length(min = 1, message = "Barcode is required"))]
    #[schema(example = "8991234500005")]
    pub barcode: String,

    #[serde(default)]
    #[validate(range(min = 0.0, message = "Cost price cannot be negative"))]
    pub cost_price: f64,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    #[schema(example = 3500)]
    pub price: f64,

    #[serde(default)]
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,

    #[serde(default)]
    pub status: ProductStatus,

    #[serde(default = "default_low_stock_alert")]
    #[validate(range(min = 0, message = "Low stock alert cannot be negative"))]
    pub low_stock_alert: i32,

    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0, message = "VAT must be between 0 and 100"))]
    pub vat_percentage: f64,

    #[serde(default)]
    pub vat_inclusive: bool,

    #[serde(default)]
    #[validate(nested)]
    pub units: Vec<ProductUnitRequest>,

    #[serde(default)]
    #[validate(nested)]
    pub multi_warehouse_distribution: Vec<WarehouseQuantityRequest>,
}

/// Updates replace every mutable field of the product.
pub type UpdateProductRequest = CreateProductRequest;

impl CreateProductRequest {
    pub fn into_draft(self, store_id: &str) -> ProductDraft {
        ProductDraft {
            store_id: store_id.to_lowercase(),
            name: self.name.trim().to_string(),
            barcode: self.barcode.trim().to_string(),
            cost_price: self.cost_price,
            price: self.price,
            stock: self.stock,
            status: self.status,
            low_stock_alert: self.low_stock_alert,
            vat_percentage: self.vat_percentage,
            vat_inclusive: self.vat_inclusive,
            units: self
                .units
                .into_iter()
                .map(|u| ProductUnit {
                    unit_name: u.unit_name.trim().to_string(),
                    barcode: u.barcode.trim().to_string(),
                    selling_price: u.selling_price,
                    conversion_factor: u.conversion_factor,
                })
                .collect(),
            multi_warehouse_distribution: self
                .multi_warehouse_distribution
                .into_iter()
                .map(|w| WarehouseQuantity {
                    warehouse_id: w.warehouse_id,
                    quantity: w.quantity,
                })
                .collect(),
        }
    }
}

/// Rows are validated one by one so a bad row does not reject the batch.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ImportProductsRequest {
    #[validate(length(min = 1, max = 1000, message = "Import between 1 and 1000 products"))]
    pub products: Vec<CreateProductRequest>,
}
