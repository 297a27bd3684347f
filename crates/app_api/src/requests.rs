use serde::Deserialize;
use usage_app::{AccountInput, AccountPatch, AppError, Result};
use usage_core::is_valid_phone_number;

/// Missing fields deserialize as empty strings so they fail validation with a
/// 400 instead of a body rejection.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CycleHistoryRequest {
    #[serde(default, alias = "userId")]
    pub account_id: String,
    #[serde(default, alias = "mdn")]
    pub phone_number: String,
}

impl CycleHistoryRequest {
    pub fn validate(&self) -> Result<()> {
        require_account_id(&self.account_id)?;
        require_phone_number(&self.phone_number)
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CurrentCycleUsageRequest {
    #[serde(default, alias = "userId")]
    pub account_id: String,
    #[serde(default, alias = "mdn")]
    pub phone_number: String,
    /// RFC 3339 instant; now when absent.
    pub as_of: Option<String>,
}

impl CurrentCycleUsageRequest {
    pub fn validate(&self) -> Result<()> {
        require_account_id(&self.account_id)?;
        require_phone_number(&self.phone_number)
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl From<CreateAccountRequest> for AccountInput {
    fn from(req: CreateAccountRequest) -> Self {
        AccountInput {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password: req.password,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl From<UpdateAccountRequest> for AccountPatch {
    fn from(req: UpdateAccountRequest) -> Self {
        AccountPatch {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password: req.password,
        }
    }
}

fn require_account_id(value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput("accountId is required".to_string()));
    }
    Ok(())
}

fn require_phone_number(value: &str) -> Result<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::InvalidInput("phoneNumber is required".to_string()));
    }
    if !is_valid_phone_number(value) {
        return Err(AppError::InvalidInput(format!(
            "phoneNumber must be 10 digits, got {value}"
        )));
    }
    Ok(())
}
