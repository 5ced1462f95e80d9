use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DEFAULT_PAUSE_REASON: &str = "Manually paused by admin";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct StoreAccount {
    pub store_id: String,
    pub total_earned: f64,
    pub total_paid: f64,
    pub due_balance: f64,
    pub threshold: f64,
    pub is_paused: bool,
    pub paused_at: Option<DateTime<Utc>>,
    pub paused_reason: Option<String>,
    pub last_payment_date: Option<DateTime<Utc>>,
    pub last_payment_amount: Option<f64>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentOutcome {
    pub applied: f64,
    pub unpaused: bool,
}

// State transitions are pure; persisting them (and the store flag) is the
// repository's job.
impl StoreAccount {
    pub fn apply_payment(&mut self, amount: f64, now: DateTime<Utc>) -> PaymentOutcome {
        let applied = amount.min(self.due_balance).max(0.0);

        self.total_paid += applied;
        self.due_balance = (self.due_balance - applied).max(0.0);
        self.last_payment_date = Some(now);
        self.last_payment_amount = Some(amount);

        PaymentOutcome {
            applied,
            unpaused: self.try_auto_unpause(),
        }
    }

    /// Returns whether the change unpaused the account.
    pub fn update_threshold(&mut self, threshold: f64) -> bool {
        self.threshold = threshold;
        self.try_auto_unpause()
    }

    pub fn pause(&mut self, reason: Option<&str>, now: DateTime<Utc>) {
        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_PAUSE_REASON);

        self.is_paused = true;
        self.paused_at = Some(now);
        self.paused_reason = Some(reason.to_string());
    }

    pub fn unpause(&mut self) {
        self.is_paused = false;
        self.paused_at = None;
        self.paused_reason = None;
    }

    fn try_auto_unpause(&mut self) -> bool {
        if self.is_paused && self.due_balance < self.threshold {
            self.unpause();
            return true;
        }
        false
    }
}
