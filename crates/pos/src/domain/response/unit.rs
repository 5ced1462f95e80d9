use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct UnitBreakdown {
    pub unit_name: String,
    pub total_quantity: f64,
    pub cost_per_unit: f64,
}
