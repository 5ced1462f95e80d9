use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Store {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub subscription_start_date: Option<DateTime<Utc>>,
    pub subscription_end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    /// A store without an end date never expires.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.subscription_end_date.is_some_and(|end| end < now)
    }
}
