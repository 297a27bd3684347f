use serde::Serialize;
use thiserror::Error;
use usage_db::DbError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),
    #[error(
        "no active billing cycle found for account {account_id} and phone number {phone_number}"
    )]
    NoActiveCycle {
        account_id: String,
        phone_number: String,
    },
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{operation} failed ({context}): {source}")]
    Store {
        operation: &'static str,
        context: String,
        #[source]
        source: DbError,
    },
    #[error("db error: {0}")]
    Db(#[from] DbError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Message(String),
}

impl AppError {
    pub(crate) fn store(operation: &'static str, context: String, source: DbError) -> Self {
        AppError::Store {
            operation,
            context,
            source,
        }
    }

    /// True for failures of the storage collaborator rather than of the request.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, AppError::Store { .. } | AppError::Db(_))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let (status, code) = match &err {
            AppError::InvalidInput(_) => (400, Some("invalid_input")),
            AppError::NoActiveCycle { .. } => (404, Some("no_active_cycle")),
            AppError::NotFound(_) => (404, Some("not_found")),
            AppError::Conflict(_) => (409, Some("conflict")),
            AppError::Store { source, .. } | AppError::Db(source) if source.is_interrupted() => {
                (504, Some("timeout"))
            }
            AppError::Store { .. } | AppError::Db(_) => (503, Some("store_unavailable")),
            AppError::Io(_) | AppError::Message(_) => (500, None),
        };
        Self {
            status,
            message: err.to_string(),
            code: code.map(str::to_string),
        }
    }
}
