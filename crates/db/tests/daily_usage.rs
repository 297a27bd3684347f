mod support;

use support::{PHONE, day, insert_usage, setup_db};
use usage_core::NewDailyUsage;
use usage_db::DbError;

#[test]
fn usage_in_range_is_inclusive_and_ascending() {
    let test_db = setup_db();
    let db = &test_db.db;
    insert_usage(db, "acct-1", PHONE, "2024-12-01", 99.0);
    insert_usage(db, "acct-1", PHONE, "2024-11-03", 320.7);
    insert_usage(db, "acct-1", PHONE, "2024-11-01", 250.5);
    insert_usage(db, "acct-1", PHONE, "2024-11-02", 180.3);
    insert_usage(db, "acct-1", PHONE, "2024-10-31", 12.0);

    let rows = db
        .usage_in_range("acct-1", PHONE, day("2024-11-01"), day("2024-11-30"))
        .expect("range");
    let dates: Vec<String> = rows.iter().map(|row| row.usage_date.to_string()).collect();
    let volumes: Vec<f64> = rows.iter().map(|row| row.used_mb).collect();
    assert_eq!(dates, vec!["2024-11-01", "2024-11-02", "2024-11-03"]);
    assert_eq!(volumes, vec![250.5, 180.3, 320.7]);
}

#[test]
fn usage_in_range_is_scoped_to_tenancy() {
    let test_db = setup_db();
    let db = &test_db.db;
    insert_usage(db, "acct-1", PHONE, "2024-11-01", 10.0);
    insert_usage(db, "acct-2", PHONE, "2024-11-02", 20.0);
    insert_usage(db, "acct-1", "5559876543", "2024-11-03", 30.0);

    let rows = db
        .usage_in_range("acct-1", PHONE, day("2024-11-01"), day("2024-11-30"))
        .expect("range");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].used_mb, 10.0);
}

#[test]
fn one_record_per_tenancy_and_day() {
    let test_db = setup_db();
    let db = &test_db.db;
    insert_usage(db, "acct-1", PHONE, "2024-11-01", 10.0);

    let duplicate = db.insert_daily_usage(&NewDailyUsage {
        phone_number: PHONE.to_string(),
        account_id: "acct-1".to_string(),
        usage_date: day("2024-11-01"),
        used_mb: 11.0,
    });
    assert!(matches!(duplicate, Err(DbError::Sqlite(_))));

    // Same number and day under the next owner is a different tenancy.
    insert_usage(db, "acct-2", PHONE, "2024-11-01", 5.0);
}

#[test]
fn update_daily_usage_corrects_volume() {
    let test_db = setup_db();
    let db = &test_db.db;
    let record = insert_usage(db, "acct-1", PHONE, "2024-11-01", 10.0);

    let updated = db
        .update_daily_usage(&record.id, 12.25)
        .expect("update")
        .expect("record");
    assert_eq!(updated.used_mb, 12.25);
    assert_eq!(updated.created_at, record.created_at);
    assert!(updated.updated_at >= record.updated_at);

    assert!(
        db.update_daily_usage("missing", 1.0)
            .expect("update missing")
            .is_none()
    );
}

#[test]
fn negative_or_non_finite_volume_is_rejected() {
    let test_db = setup_db();
    let db = &test_db.db;
    for used_mb in [-1.0, f64::NAN, f64::INFINITY] {
        let result = db.insert_daily_usage(&NewDailyUsage {
            phone_number: PHONE.to_string(),
            account_id: "acct-1".to_string(),
            usage_date: day("2024-11-01"),
            used_mb,
        });
        assert!(matches!(result, Err(DbError::InvalidRecord(_))));
    }
}
