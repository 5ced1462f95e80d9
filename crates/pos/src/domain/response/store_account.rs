use crate::model::StoreAccount as StoreAccountModel;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct StoreAccountResponse {
    pub store_id: String,
    pub total_earned: f64,
    pub total_paid: f64,
    pub due_balance: f64,
    pub threshold: f64,
    pub is_paused: bool,
    pub paused_at: Option<String>,
    pub paused_reason: Option<String>,
    pub last_payment_date: Option<String>,
    pub last_payment_amount: Option<f64>,
    pub updated_at: String,
}

impl From<StoreAccountModel> for StoreAccountResponse {
    fn from(value: StoreAccountModel) -> Self {
        StoreAccountResponse {
            store_id: value.store_id,
            total_earned: value.total_earned,
            total_paid: value.total_paid,
            due_balance: value.due_balance,
            threshold: value.threshold,
            is_paused: value.is_paused,
            paused_at: value.paused_at.map(|dt| dt.to_rfc3339()),
            paused_reason: value.paused_reason,
            last_payment_date: value.last_payment_date.map(|dt| dt.to_rfc3339()),
            last_payment_amount: value.last_payment_amount,
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct PaymentResponse {
    pub applied: f64,
    pub account: StoreAccountResponse,
}
