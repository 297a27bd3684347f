use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};

pub fn parse_instant(value: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(value.trim())
        .map_err(|err| AppError::InvalidInput(format!("invalid datetime: {}", err)))?;
    Ok(parsed.with_timezone(&Utc))
}

/// The instant a request asks about, defaulting to now.
pub fn resolve_instant(as_of: Option<&str>) -> Result<DateTime<Utc>> {
    match as_of {
        Some(value) => parse_instant(value),
        None => Ok(Utc::now()),
    }
}
