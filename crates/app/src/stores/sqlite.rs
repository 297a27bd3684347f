use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;
use usage_core::{
    Account, AccountChanges, BillingCycle, CreateOutcome, DailyUsageRecord, Deadline, NewAccount,
    UpdateOutcome,
};
use usage_db::{Db, Result as DbResult};

use super::{AccountStore, CycleStore, UsageStore};

/// SQLite-backed implementation of every store trait.
///
/// Each call opens its own connection and binds it to the caller's deadline,
/// so the handle itself carries no mutable state and is shared freely.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteStore {
    pub fn new(db_path: impl Into<PathBuf>, busy_timeout: Duration) -> Self {
        Self {
            db_path: db_path.into(),
            busy_timeout,
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn migrate(&self) -> DbResult<()> {
        let mut db = Db::open(&self.db_path)?;
        db.migrate()
    }

    pub fn ping(&self, deadline: &Deadline) -> DbResult<()> {
        self.with_db(deadline, |db| db.ping())
    }

    /// Runs `f` on a fresh connection bound to `deadline`.
    pub fn with_db<T>(
        &self,
        deadline: &Deadline,
        f: impl FnOnce(&mut Db) -> DbResult<T>,
    ) -> DbResult<T> {
        if let Some(reason) = deadline.interruption() {
            return Err(reason.into());
        }
        let mut db = Db::open(&self.db_path)?;
        db.bind_deadline(deadline, self.busy_timeout)?;
        f(&mut db).map_err(|err| err.resolve_interrupt(deadline))
    }
}

impl CycleStore for SqliteStore {
    fn find_active_cycles(
        &self,
        account_id: &str,
        phone_number: &str,
        instant: DateTime<Utc>,
        deadline: &Deadline,
    ) -> DbResult<Vec<BillingCycle>> {
        let day = instant.date_naive();
        debug!(account_id, phone_number, %day, "querying active cycles");
        self.with_db(deadline, |db| db.active_cycles(account_id, phone_number, day))
    }

    fn find_all_by_phone_number(
        &self,
        phone_number: &str,
        deadline: &Deadline,
    ) -> DbResult<Vec<BillingCycle>> {
        self.with_db(deadline, |db| db.cycles_for_phone_number(phone_number))
    }
}

impl UsageStore for SqliteStore {
    fn find_by_date_range(
        &self,
        account_id: &str,
        phone_number: &str,
        start: NaiveDate,
        end: NaiveDate,
        deadline: &Deadline,
    ) -> DbResult<Vec<DailyUsageRecord>> {
        self.with_db(deadline, |db| {
            db.usage_in_range(account_id, phone_number, start, end)
        })
    }
}

impl AccountStore for SqliteStore {
    fn create_if_absent(
        &self,
        account: &NewAccount,
        deadline: &Deadline,
    ) -> DbResult<CreateOutcome<Account>> {
        self.with_db(deadline, |db| db.create_account_if_absent(account))
    }

    fn update(
        &self,
        id: &str,
        changes: &AccountChanges,
        deadline: &Deadline,
    ) -> DbResult<UpdateOutcome<Account>> {
        self.with_db(deadline, |db| db.update_account(id, changes))
    }
}
