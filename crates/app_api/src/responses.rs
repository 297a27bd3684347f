use chrono::{DateTime, Utc};
use serde::Serialize;
use usage_core::{Account, CycleSummary, DailyUsagePoint};

#[derive(Debug, Serialize)]
pub struct CycleHistoryResponse {
    pub cycles: Vec<CycleSummary>,
}

#[derive(Debug, Serialize)]
pub struct CurrentCycleUsageResponse {
    pub usage: Vec<DailyUsagePoint>,
}

/// Public account profile. The password hash is never part of it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy",
            error: None,
        }
    }

    pub fn unhealthy(error: String) -> Self {
        Self {
            status: "unhealthy",
            error: Some(error),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.error.is_none()
    }
}
