#![allow(dead_code)]

use std::path::PathBuf;

use chrono::NaiveDate;
use tempfile::TempDir;
use usage_core::{BillingCycle, DailyUsageRecord, NewAccount, NewBillingCycle, NewDailyUsage};
use usage_db::Db;

pub const PHONE: &str = "5551234567";

pub struct TestDb {
    pub _dir: TempDir,
    pub db: Db,
    pub path: PathBuf,
}

pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("test.sqlite");
    let mut db = Db::open(&path).expect("open db");
    db.migrate().expect("migrate db");
    TestDb {
        _dir: dir,
        db,
        path,
    }
}

pub fn day(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("date")
}

pub fn insert_cycle(db: &Db, account_id: &str, phone: &str, start: &str, end: &str) -> BillingCycle {
    db.insert_cycle(&NewBillingCycle {
        phone_number: phone.to_string(),
        start_date: day(start),
        end_date: day(end),
        account_id: account_id.to_string(),
    })
    .expect("insert cycle")
}

pub fn insert_usage(
    db: &Db,
    account_id: &str,
    phone: &str,
    date: &str,
    used_mb: f64,
) -> DailyUsageRecord {
    db.insert_daily_usage(&NewDailyUsage {
        phone_number: phone.to_string(),
        account_id: account_id.to_string(),
        usage_date: day(date),
        used_mb,
    })
    .expect("insert usage")
}

pub fn new_account(email: &str) -> NewAccount {
    NewAccount {
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        email: email.to_string(),
        password_hash: "$argon2id$v=19$placeholder".to_string(),
    }
}
