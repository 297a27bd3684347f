mod support;

use chrono::{TimeZone, Utc};
use support::{PHONE, day, insert_cycle, setup_db};
use usage_core::NewBillingCycle;
use usage_db::DbError;

#[test]
fn history_spans_every_owner_newest_first() {
    let test_db = setup_db();
    let db = &test_db.db;
    insert_cycle(db, "acct-old", PHONE, "2024-09-01", "2024-09-30");
    insert_cycle(db, "acct-new", PHONE, "2024-11-01", "2024-11-30");
    insert_cycle(db, "acct-old", PHONE, "2024-10-01", "2024-10-31");
    insert_cycle(db, "acct-other", "5559876543", "2024-12-01", "2024-12-31");

    let history = db.cycles_for_phone_number(PHONE).expect("history");
    let starts: Vec<String> = history
        .iter()
        .map(|cycle| cycle.start_date.to_string())
        .collect();
    assert_eq!(starts, vec!["2024-11-01", "2024-10-01", "2024-09-01"]);
    assert_eq!(history[0].account_id, "acct-new");
    assert_eq!(history[2].account_id, "acct-old");
}

#[test]
fn active_cycles_match_inclusive_bounds_for_tenancy_only() {
    let test_db = setup_db();
    let db = &test_db.db;
    let november = insert_cycle(db, "acct-1", PHONE, "2024-11-01", "2024-11-30");
    insert_cycle(db, "acct-1", PHONE, "2024-10-01", "2024-10-31");
    insert_cycle(db, "acct-2", PHONE, "2024-11-15", "2024-12-14");

    for probe in ["2024-11-01", "2024-11-15", "2024-11-30"] {
        let found = db
            .active_cycles("acct-1", PHONE, day(probe))
            .expect("active cycles");
        assert_eq!(found.len(), 1, "probe {probe}");
        assert_eq!(found[0].id, november.id);
    }

    assert!(
        db.active_cycles("acct-1", PHONE, day("2024-12-01"))
            .expect("after")
            .is_empty()
    );
    assert!(
        db.active_cycles("acct-1", "5550000000", day("2024-11-15"))
            .expect("other number")
            .is_empty()
    );
}

#[test]
fn overlapping_cycles_come_back_newest_start_first() {
    let test_db = setup_db();
    let db = &test_db.db;
    insert_cycle(db, "acct-1", PHONE, "2024-11-01", "2024-11-30");
    let later = insert_cycle(db, "acct-1", PHONE, "2024-11-10", "2024-12-09");

    let found = db
        .active_cycles("acct-1", PHONE, day("2024-11-20"))
        .expect("active cycles");
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].id, later.id);
}

#[test]
fn insert_cycle_rejects_inverted_range() {
    let test_db = setup_db();
    let err = test_db
        .db
        .insert_cycle(&NewBillingCycle {
            phone_number: PHONE.to_string(),
            start_date: day("2024-12-01"),
            end_date: day("2024-11-01"),
            account_id: "acct-1".to_string(),
        })
        .expect_err("inverted range");
    assert!(matches!(err, DbError::InvalidRecord(_)));
}

#[test]
fn single_day_cycle_is_allowed() {
    let test_db = setup_db();
    let db = &test_db.db;
    let cycle = insert_cycle(db, "acct-1", PHONE, "2024-11-01", "2024-11-01");
    let instant = Utc.with_ymd_and_hms(2024, 11, 1, 23, 59, 59).unwrap();
    assert!(cycle.is_active_at(instant));

    let loaded = db.get_cycle_by_id(&cycle.id).expect("load").expect("cycle");
    assert_eq!(loaded, cycle);
}

#[test]
fn cycles_for_account_lists_only_that_owner() {
    let test_db = setup_db();
    let db = &test_db.db;
    insert_cycle(db, "acct-1", PHONE, "2024-10-01", "2024-10-31");
    insert_cycle(db, "acct-2", PHONE, "2024-11-01", "2024-11-30");
    insert_cycle(db, "acct-1", "5559876543", "2024-11-01", "2024-11-30");

    let cycles = db.cycles_for_account("acct-1").expect("cycles");
    assert_eq!(cycles.len(), 2);
    assert!(cycles.iter().all(|cycle| cycle.account_id == "acct-1"));
    assert_eq!(cycles[0].start_date, day("2024-11-01"));
}
