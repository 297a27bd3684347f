use std::sync::Arc;

use argon2::Argon2;
use argon2::password_hash::{PasswordHasher, SaltString};
use rand::rngs::OsRng;
use tracing::info;
use usage_core::{Account, AccountChanges, CreateOutcome, Deadline, NewAccount, UpdateOutcome};

use crate::error::{AppError, Result};
use crate::stores::AccountStore;

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 50;
const PASSWORD_MIN_CHARS: usize = 8;

#[derive(Debug, Clone)]
pub struct AccountInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Partial profile update; absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
}

impl AccountService {
    pub(super) fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    pub fn create_account(&self, input: AccountInput, deadline: &Deadline) -> Result<Account> {
        let new_account = NewAccount {
            first_name: validate_name("first_name", &input.first_name)?,
            last_name: validate_name("last_name", &input.last_name)?,
            email: validate_email(&input.email)?,
            password_hash: hash_password(validate_password(&input.password)?)?,
        };
        let outcome = self
            .accounts
            .create_if_absent(&new_account, deadline)
            .map_err(|source| {
                AppError::store(
                    "create account",
                    format!("email={}", new_account.email),
                    source,
                )
            })?;
        match outcome {
            CreateOutcome::Created(account) => {
                info!(account_id = %account.id, "account created");
                Ok(account)
            }
            CreateOutcome::AlreadyExists => Err(AppError::Conflict(format!(
                "email {} already exists",
                new_account.email
            ))),
        }
    }

    pub fn update_account(
        &self,
        id: &str,
        patch: AccountPatch,
        deadline: &Deadline,
    ) -> Result<Account> {
        let id = id.trim();
        if id.is_empty() {
            return Err(AppError::InvalidInput("id is required".to_string()));
        }
        let changes = AccountChanges {
            first_name: patch
                .first_name
                .as_deref()
                .map(|value| validate_name("first_name", value))
                .transpose()?,
            last_name: patch
                .last_name
                .as_deref()
                .map(|value| validate_name("last_name", value))
                .transpose()?,
            email: patch.email.as_deref().map(validate_email).transpose()?,
            password_hash: patch
                .password
                .as_deref()
                .map(|value| validate_password(value).and_then(hash_password))
                .transpose()?,
        };
        if changes.is_empty() {
            return Err(AppError::InvalidInput(
                "at least one field must be provided".to_string(),
            ));
        }
        let outcome = self
            .accounts
            .update(id, &changes, deadline)
            .map_err(|source| AppError::store("update account", format!("id={id}"), source))?;
        match outcome {
            UpdateOutcome::Updated(account) => {
                info!(account_id = %account.id, "account updated");
                Ok(account)
            }
            UpdateOutcome::NotFound => Err(AppError::NotFound(format!("account {id} not found"))),
            UpdateOutcome::Conflict => Err(AppError::Conflict(format!(
                "email {} already exists",
                changes.email.unwrap_or_default()
            ))),
        }
    }
}

fn validate_name(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    let chars = trimmed.chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&chars) {
        return Err(AppError::InvalidInput(format!(
            "{field} must be between {NAME_MIN_CHARS} and {NAME_MAX_CHARS} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_email(value: &str) -> Result<String> {
    let email = value.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(AppError::InvalidInput(format!("invalid email: {value}")));
    }
    Ok(email)
}

fn validate_password(value: &str) -> Result<&str> {
    if value.chars().count() < PASSWORD_MIN_CHARS {
        return Err(AppError::InvalidInput(format!(
            "password must be at least {PASSWORD_MIN_CHARS} characters"
        )));
    }
    Ok(value)
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AppError::Message(format!("hash password: {err}")))
}
