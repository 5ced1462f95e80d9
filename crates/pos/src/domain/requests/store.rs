use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReactivateStoreRequest {
    /// Renews the subscription window from now until this date.
    pub subscription_end_date: Option<DateTime<Utc>>,
}
