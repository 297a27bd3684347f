mod sqlite;

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use usage_core::{
    Account, AccountChanges, BillingCycle, CreateOutcome, DailyUsageRecord, Deadline, NewAccount,
    UpdateOutcome,
};
use usage_db::Result as DbResult;

pub use sqlite::SqliteStore;

pub trait CycleStore: Send + Sync {
    /// Every cycle of the tenancy whose inclusive range contains the UTC day of
    /// `instant`, newest start first.
    fn find_active_cycles(
        &self,
        account_id: &str,
        phone_number: &str,
        instant: DateTime<Utc>,
        deadline: &Deadline,
    ) -> DbResult<Vec<BillingCycle>>;

    /// All cycles ever recorded for the number, regardless of owner, by start
    /// date descending.
    fn find_all_by_phone_number(
        &self,
        phone_number: &str,
        deadline: &Deadline,
    ) -> DbResult<Vec<BillingCycle>>;
}

pub trait UsageStore: Send + Sync {
    /// Records with `start <= usage_date <= end`, ascending by date.
    fn find_by_date_range(
        &self,
        account_id: &str,
        phone_number: &str,
        start: NaiveDate,
        end: NaiveDate,
        deadline: &Deadline,
    ) -> DbResult<Vec<DailyUsageRecord>>;
}

pub trait AccountStore: Send + Sync {
    fn create_if_absent(
        &self,
        account: &NewAccount,
        deadline: &Deadline,
    ) -> DbResult<CreateOutcome<Account>>;

    fn update(
        &self,
        id: &str,
        changes: &AccountChanges,
        deadline: &Deadline,
    ) -> DbResult<UpdateOutcome<Account>>;
}

/// The collaborators the services are wired against.
#[derive(Clone)]
pub struct Stores {
    pub cycles: Arc<dyn CycleStore>,
    pub usage: Arc<dyn UsageStore>,
    pub accounts: Arc<dyn AccountStore>,
}

impl Stores {
    pub fn sqlite(store: Arc<SqliteStore>) -> Self {
        Self {
            cycles: store.clone(),
            usage: store.clone(),
            accounts: store,
        }
    }
}
