use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use usage_core::{DailyUsagePoint, Deadline};

use crate::error::{AppError, Result};
use crate::services::{CycleResolver, require};
use crate::stores::UsageStore;

#[derive(Clone)]
pub struct UsageAggregator {
    resolver: CycleResolver,
    usage: Arc<dyn UsageStore>,
}

impl UsageAggregator {
    pub(super) fn new(resolver: CycleResolver, usage: Arc<dyn UsageStore>) -> Self {
        Self { resolver, usage }
    }

    /// Daily usage inside the cycle active at `instant`, in the store's
    /// ascending date order.
    pub fn current_cycle_usage(
        &self,
        account_id: &str,
        phone_number: &str,
        instant: DateTime<Utc>,
        deadline: &Deadline,
    ) -> Result<Vec<DailyUsagePoint>> {
        let account_id = require("account_id", account_id)?;
        let phone_number = require("phone_number", phone_number)?;

        let cycle = self
            .resolver
            .resolve_active_cycle(account_id, phone_number, instant, deadline)?
            .ok_or_else(|| AppError::NoActiveCycle {
                account_id: account_id.to_string(),
                phone_number: phone_number.to_string(),
            })?;

        let records = self
            .usage
            .find_by_date_range(
                account_id,
                phone_number,
                cycle.start_date,
                cycle.end_date,
                deadline,
            )
            .map_err(|source| {
                AppError::store(
                    "find usage by date range",
                    format!(
                        "account={account_id} phone={phone_number} start={} end={}",
                        cycle.start_date, cycle.end_date
                    ),
                    source,
                )
            })?;

        let fetched = records.len();
        let points: Vec<DailyUsagePoint> = records
            .iter()
            .filter(|record| {
                let inside = cycle.covers(record.usage_date);
                if !inside {
                    warn!(
                        record_id = %record.id,
                        usage_date = %record.usage_date,
                        cycle_id = %cycle.id,
                        "usage store returned a record outside the cycle; dropping it"
                    );
                }
                inside
            })
            .map(|record| record.point())
            .collect();
        debug!(
            cycle_id = %cycle.id,
            fetched,
            returned = points.len(),
            "aggregated current cycle usage"
        );
        Ok(points)
    }
}
