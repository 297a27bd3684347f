use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;
use usage_core::{BillingCycle, Deadline, select_active_cycle};

use crate::error::{AppError, Result};
use crate::services::require;
use crate::stores::CycleStore;

#[derive(Clone)]
pub struct CycleResolver {
    cycles: Arc<dyn CycleStore>,
}

impl CycleResolver {
    pub(super) fn new(cycles: Arc<dyn CycleStore>) -> Self {
        Self { cycles }
    }

    /// The cycle of this tenancy that contains `instant`, or `None` when the
    /// pair has no cycle covering it.
    ///
    /// Overlapping cycles are a data-integrity problem upstream; the newest
    /// start (then newest creation) is used and the overlap is logged.
    pub fn resolve_active_cycle(
        &self,
        account_id: &str,
        phone_number: &str,
        instant: DateTime<Utc>,
        deadline: &Deadline,
    ) -> Result<Option<BillingCycle>> {
        let account_id = require("account_id", account_id)?;
        let phone_number = require("phone_number", phone_number)?;

        let candidates = self
            .cycles
            .find_active_cycles(account_id, phone_number, instant, deadline)
            .map_err(|source| {
                AppError::store(
                    "find active cycle",
                    format!("account={account_id} phone={phone_number} at={instant}"),
                    source,
                )
            })?;
        if candidates.len() > 1 {
            warn!(
                account_id,
                phone_number,
                matches = candidates.len(),
                %instant,
                "multiple active billing cycles; using the most recent start"
            );
        }
        Ok(select_active_cycle(candidates, instant))
    }
}
