use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RecordPaymentRequest {
    #[validate(range(exclusive_min = 0.0, message = "Payment amount must be greater than zero"))]
    #[schema(example = 2500)]
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateThresholdRequest {
    #[validate(range(min = 0.0, message = "Threshold cannot be negative"))]
    #[schema(example = 10000)]
    pub threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SetPausedRequest {
    pub is_paused: bool,

    #[validate(length(max = 500, message = "Reason is too long"))]
    pub reason: Option<String>,
}
