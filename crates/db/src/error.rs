use rusqlite::ErrorCode;
use usage_core::{Deadline, Interruption};

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("operation cancelled")]
    Cancelled,
    #[error("deadline exceeded")]
    DeadlineExceeded,
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

impl DbError {
    /// Turns SQLite's generic `SQLITE_INTERRUPT` into the reason the deadline
    /// recorded for it. A lock wait cut short because the deadline ran out
    /// (`SQLITE_BUSY` after the budget is spent) counts as interrupted too.
    pub fn resolve_interrupt(self, deadline: &Deadline) -> Self {
        let code = match self {
            DbError::Sqlite(ref err) => err.sqlite_error_code(),
            _ => None,
        };
        match (code, deadline.interruption()) {
            (Some(ErrorCode::OperationInterrupted), Some(Interruption::Cancelled)) => {
                DbError::Cancelled
            }
            (Some(ErrorCode::OperationInterrupted), _) => DbError::DeadlineExceeded,
            (Some(ErrorCode::DatabaseBusy), Some(reason)) => reason.into(),
            _ => self,
        }
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, DbError::Cancelled | DbError::DeadlineExceeded)
    }

    pub(crate) fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DbError::Sqlite(err) if err.sqlite_error_code() == Some(ErrorCode::ConstraintViolation)
        )
    }
}

impl From<Interruption> for DbError {
    fn from(reason: Interruption) -> Self {
        match reason {
            Interruption::Cancelled => DbError::Cancelled,
            Interruption::Expired => DbError::DeadlineExceeded,
        }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
