use std::sync::Arc;

use usage_core::{CycleSummary, Deadline};

use crate::error::{AppError, Result};
use crate::services::require;
use crate::stores::CycleStore;

#[derive(Clone)]
pub struct HistoryProjector {
    cycles: Arc<dyn CycleStore>,
}

impl HistoryProjector {
    pub(super) fn new(cycles: Arc<dyn CycleStore>) -> Self {
        Self { cycles }
    }

    /// Every cycle recorded for the number, newest start first, including those
    /// of earlier holders. `account_id` must be present but does not filter.
    pub fn cycle_history(
        &self,
        account_id: &str,
        phone_number: &str,
        deadline: &Deadline,
    ) -> Result<Vec<CycleSummary>> {
        require("account_id", account_id)?;
        let phone_number = require("phone_number", phone_number)?;

        let cycles = self
            .cycles
            .find_all_by_phone_number(phone_number, deadline)
            .map_err(|source| {
                AppError::store(
                    "find cycles by phone number",
                    format!("phone={phone_number}"),
                    source,
                )
            })?;
        Ok(cycles.iter().map(|cycle| cycle.summary()).collect())
    }
}
