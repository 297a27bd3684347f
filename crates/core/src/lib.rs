mod deadline;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub use deadline::{CancelOnDrop, Deadline, Interruption};

/// One recurring billing period for one phone number, owned by the account that
/// held the number when the cycle was opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingCycle {
    pub id: String,
    pub phone_number: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub account_id: String,
    pub created_at: DateTime<Utc>,
}

impl BillingCycle {
    /// Both bounds are inclusive.
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }

    pub fn is_active_at(&self, instant: DateTime<Utc>) -> bool {
        self.covers(instant.date_naive())
    }

    pub fn summary(&self) -> CycleSummary {
        CycleSummary {
            cycle_id: self.id.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBillingCycle {
    pub phone_number: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub account_id: String,
}

/// History entry for a phone number. The owning account is left out so a caller
/// asking by number alone never learns who held it before.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleSummary {
    pub cycle_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyUsageRecord {
    pub id: String,
    pub phone_number: String,
    pub account_id: String,
    pub usage_date: NaiveDate,
    pub used_mb: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DailyUsageRecord {
    pub fn point(&self) -> DailyUsagePoint {
        DailyUsagePoint {
            date: self.usage_date,
            usage_mb: self.used_mb,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDailyUsage {
    pub phone_number: String,
    pub account_id: String,
    pub usage_date: NaiveDate,
    pub used_mb: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyUsagePoint {
    pub date: NaiveDate,
    #[serde(rename = "dailyUsage")]
    pub usage_mb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl AccountChanges {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
    }
}

/// Result of an insert keyed on a uniqueness constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome<T> {
    Created(T),
    AlreadyExists,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome<T> {
    Updated(T),
    NotFound,
    Conflict,
}

/// Picks the cycle that owns `instant` out of the candidates a store returned.
///
/// Exactly one candidate is expected. When upstream data overlaps, the most
/// recent start date wins, then the most recently created cycle.
pub fn select_active_cycle(
    candidates: Vec<BillingCycle>,
    instant: DateTime<Utc>,
) -> Option<BillingCycle> {
    candidates
        .into_iter()
        .filter(|cycle| cycle.is_active_at(instant))
        .max_by(|a, b| {
            a.start_date
                .cmp(&b.start_date)
                .then_with(|| a.created_at.cmp(&b.created_at))
        })
}

/// North American MDN: ten ASCII digits, no separators.
pub fn is_valid_phone_number(value: &str) -> bool {
    value.len() == 10 && value.bytes().all(|byte| byte.is_ascii_digit())
}
