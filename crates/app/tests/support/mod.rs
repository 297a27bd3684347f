#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tempfile::TempDir;
use usage_app::{AccountStore, AppConfig, AppState, CycleStore, SqliteStore, Stores, UsageStore};
use usage_core::{
    Account, AccountChanges, BillingCycle, CreateOutcome, DailyUsageRecord, Deadline, NewAccount,
    NewBillingCycle, NewDailyUsage, UpdateOutcome,
};
use usage_db::{DbError, Result as DbResult};

pub const ACCOUNT: &str = "acct-1";
pub const PHONE: &str = "5551234567";

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).single().expect("valid instant")
}

pub fn cycle(id: &str, account_id: &str, start: NaiveDate, end: NaiveDate) -> BillingCycle {
    BillingCycle {
        id: id.to_string(),
        phone_number: PHONE.to_string(),
        start_date: start,
        end_date: end,
        account_id: account_id.to_string(),
        created_at: at(2024, 1, 1, 0),
    }
}

pub fn usage(id: &str, date: NaiveDate, used_mb: f64) -> DailyUsageRecord {
    DailyUsageRecord {
        id: id.to_string(),
        phone_number: PHONE.to_string(),
        account_id: ACCOUNT.to_string(),
        usage_date: date,
        used_mb,
        created_at: at(2024, 1, 1, 0),
        updated_at: at(2024, 1, 1, 0),
    }
}

/// In-memory stores that hand back canned rows and count every call.
#[derive(Default)]
pub struct FakeStore {
    pub cycles: Vec<BillingCycle>,
    pub usage: Vec<DailyUsageRecord>,
    pub fail_with: Option<fn() -> DbError>,
    pub create_outcome: Option<CreateOutcome<Account>>,
    pub update_outcome: Option<UpdateOutcome<Account>>,
    pub calls: AtomicUsize,
}

impl FakeStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) -> DbResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fail_with {
            Some(make_err) => Err(make_err()),
            None => Ok(()),
        }
    }
}

impl CycleStore for FakeStore {
    fn find_active_cycles(
        &self,
        account_id: &str,
        phone_number: &str,
        instant: DateTime<Utc>,
        _deadline: &Deadline,
    ) -> DbResult<Vec<BillingCycle>> {
        self.record_call()?;
        Ok(self
            .cycles
            .iter()
            .filter(|c| c.account_id == account_id && c.phone_number == phone_number)
            .filter(|c| c.is_active_at(instant))
            .cloned()
            .collect())
    }

    fn find_all_by_phone_number(
        &self,
        phone_number: &str,
        _deadline: &Deadline,
    ) -> DbResult<Vec<BillingCycle>> {
        self.record_call()?;
        let mut rows: Vec<BillingCycle> = self
            .cycles
            .iter()
            .filter(|c| c.phone_number == phone_number)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(rows)
    }
}

impl UsageStore for FakeStore {
    /// Returns every canned row without filtering, so callers must bound them.
    fn find_by_date_range(
        &self,
        _account_id: &str,
        _phone_number: &str,
        _start: NaiveDate,
        _end: NaiveDate,
        _deadline: &Deadline,
    ) -> DbResult<Vec<DailyUsageRecord>> {
        self.record_call()?;
        Ok(self.usage.clone())
    }
}

impl AccountStore for FakeStore {
    fn create_if_absent(
        &self,
        _account: &NewAccount,
        _deadline: &Deadline,
    ) -> DbResult<CreateOutcome<Account>> {
        self.record_call()?;
        Ok(self
            .create_outcome
            .clone()
            .unwrap_or(CreateOutcome::AlreadyExists))
    }

    fn update(
        &self,
        _id: &str,
        _changes: &AccountChanges,
        _deadline: &Deadline,
    ) -> DbResult<UpdateOutcome<Account>> {
        self.record_call()?;
        Ok(self.update_outcome.clone().unwrap_or(UpdateOutcome::NotFound))
    }
}

/// App state whose services run against `fake`.
pub fn fake_state(fake: Arc<FakeStore>) -> AppState {
    let config = AppConfig::new("unused.sqlite".into());
    let store = Arc::new(SqliteStore::new(&config.db_path, config.busy_timeout));
    let stores = Stores {
        cycles: fake.clone(),
        usage: fake.clone(),
        accounts: fake,
    };
    AppState::with_stores(config, store, stores)
}

pub struct TestApp {
    pub _dir: TempDir,
    pub state: AppState,
}

/// App state backed by a migrated SQLite file in a temp dir.
pub fn sqlite_app() -> TestApp {
    let dir = tempfile::tempdir().expect("temp dir");
    let state = sqlite_state(dir.path());
    TestApp { _dir: dir, state }
}

pub fn sqlite_state(dir: &Path) -> AppState {
    let state = AppState::new(AppConfig::new(dir.join("app.sqlite")));
    state.setup_db().expect("setup db");
    state
}

pub fn seed_cycle(state: &AppState, account_id: &str, start: NaiveDate, end: NaiveDate) -> BillingCycle {
    let db = state.open_db().expect("open db");
    db.insert_cycle(&NewBillingCycle {
        phone_number: PHONE.to_string(),
        start_date: start,
        end_date: end,
        account_id: account_id.to_string(),
    })
    .expect("insert cycle")
}

pub fn seed_usage(state: &AppState, date: NaiveDate, used_mb: f64) -> DailyUsageRecord {
    let db = state.open_db().expect("open db");
    db.insert_daily_usage(&NewDailyUsage {
        phone_number: PHONE.to_string(),
        account_id: ACCOUNT.to_string(),
        usage_date: date,
        used_mb,
    })
    .expect("insert usage")
}
