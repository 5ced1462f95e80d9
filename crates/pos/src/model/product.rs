use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
    Hidden,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Inactive => "inactive",
            ProductStatus::Hidden => "hidden",
        }
    }
}

impl TryFrom<String> for ProductStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "active" => Ok(ProductStatus::Active),
            "inactive" => Ok(ProductStatus::Inactive),
            "hidden" => Ok(ProductStatus::Hidden),
            other => Err(format!("unknown product status '{other}'")),
        }
    }
}

/// A sellable packaging of the product, e.g. a box of 12.
///
/// `conversion_factor` is how many base units one of this unit contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductUnit {
    pub unit_name: String,
    pub barcode: String,
    pub selling_price: f64,
    pub conversion_factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WarehouseQuantity {
    pub warehouse_id: String,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub store_id: String,
    pub name: String,
    pub barcode: String,
    pub cost_price: f64,
    pub price: f64,
    pub stock: i32,
    #[sqlx(try_from = "String")]
    pub status: ProductStatus,
    pub low_stock_alert: i32,
    pub vat_percentage: f64,
    pub vat_inclusive: bool,
    pub units: Json<Vec<ProductUnit>>,
    pub multi_warehouse_distribution: Json<Vec<WarehouseQuantity>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Primary barcode followed by every non-empty unit barcode.
    pub fn all_barcodes(&self) -> Vec<String> {
        std::iter::once(self.barcode.clone())
            .chain(
                self.units
                    .iter()
                    .map(|unit| unit.barcode.trim())
                    .filter(|barcode| !barcode.is_empty())
                    .map(str::to_string),
            )
            .collect()
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.low_stock_alert
    }
}

/// Column values for an insert or a full-row update.
#[derive(Debug, Clone)]
pub struct ProductDraft {
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_barcodes_skips_blank_units() {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            store_id: "s1".into(),
            name: "Water".into(),
            barcode: "MAIN001".into(),
            cost_price: 1.0,
            price: 2.0,
            stock: 5,
            status: ProductStatus::Active,
            low_stock_alert: 10,
            vat_percentage: 0.0,
            vat_inclusive: false,
            units: Json(vec![
                ProductUnit {
                    unit_name: "Box".into(),
                    barcode: "SUB001".into(),
                    selling_price: 20.0,
                    conversion_factor: 12.0,
                },
                ProductUnit {
                    unit_name: "Pallet".into(),
                    barcode: "  ".into(),
                    selling_price: 200.0,
                    conversion_factor: 120.0,
                },
            ]),
            multi_warehouse_distribution: Json(vec![]),
            created_at: now,
            updated_at: now,
        };

        assert_eq!(product.all_barcodes(), vec!["MAIN001", "SUB001"]);
        assert!(product.is_low_stock());
    }

    #[test]
    fn status_parses_lowercase_only() {
        assert_eq!(
            ProductStatus::try_from("hidden".to_string()),
            Ok(ProductStatus::Hidden)
        );
        assert!(ProductStatus::try_from("Active".to_string()).is_err());
    }
}
