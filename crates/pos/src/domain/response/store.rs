use crate::model::Store as StoreModel;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct SubscriptionStatusResponse {
    pub is_active: bool,
    pub subscription_end_date: Option<String>,
    pub subscription_expired: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct StoreResponse {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub subscription_start_date: Option<String>,
    pub subscription_end_date: Option<String>,
}

impl From<StoreModel> for StoreResponse {
    fn from(value: StoreModel) -> Self {
        StoreResponse {
            id: value.id,
            name: value.name,
            is_active: value.is_active,
            subscription_start_date: value.subscription_start_date.map(|dt| dt.to_rfc3339()),
            subscription_end_date: value.subscription_end_date.map(|dt| dt.to_rfc3339()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SweepResponse {
    pub deactivated: u64,
}
