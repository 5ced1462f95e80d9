use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// One level of a packaging chain, listed from the largest unit down.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UnitInput {
    #[schema(example = "Box")]
    pub unit_name: String,

    #[serde(default)]
    #[schema(example = "8991234500012")]
    pub barcode: String,

    /// How many of the next unit make up one of this unit; 0 for the last unit.
    #[serde(default)]
    #[schema(example = 12)]
    pub sub_units_per_this_unit: u32,

    #[serde(default)]
    pub selling_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CalculateUnitsRequest {
    #[schema(example = 10)]
    pub initial_quantity: f64,

    #[validate(range(min = 0.0, message = "Total purchase price cannot be negative"))]
    #[schema(example = 100)]
    pub total_purchase_price: f64,

    #[validate(length(min = 1, message = "At least one unit is required"))]
    pub units: Vec<UnitInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateMultiUnitProductRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    pub initial_quantity: f64,

    #[validate(range(min = 0.0, message = "Total purchase price cannot be negative"))]
    pub total_purchase_price: f64,

    #[validate(length(min = 1, message = "At least one unit is required"))]
    pub units: Vec<UnitInput>,

    #[serde(default = "default_low_stock_alert")]
    #[validate(range(min = 0, message = "Low stock alert cannot be negative"))]
    pub low_stock_alert: i32,

    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0, message = "VAT must be between 0 and 100"))]
    pub vat_percentage: f64,

    #[serde(default)]
    pub vat_inclusive: bool,
}

fn default_low_stock_alert() -> i32 {
    10
}
