mod support;

use std::time::Duration;

use support::{ACCOUNT, PHONE, at, day, seed_cycle, seed_usage, sqlite_app};
use usage_app::{ApiError, AppConfig, AppError, AppState};
use usage_core::Deadline;

#[test]
fn current_cycle_usage_against_sqlite() {
    let app = sqlite_app();
    seed_cycle(&app.state, ACCOUNT, day(2024, 10, 1), day(2024, 10, 31));
    let november = seed_cycle(&app.state, ACCOUNT, day(2024, 11, 1), day(2024, 11, 30));
    seed_usage(&app.state, day(2024, 10, 31), 75.0);
    seed_usage(&app.state, day(2024, 11, 1), 250.5);
    seed_usage(&app.state, day(2024, 11, 2), 180.3);
    seed_usage(&app.state, day(2024, 11, 3), 320.7);
    seed_usage(&app.state, day(2024, 12, 1), 12.0);

    let resolved = app
        .state
        .services
        .cycles
        .resolve_active_cycle(ACCOUNT, PHONE, at(2024, 11, 15, 12), &Deadline::none())
        .expect("resolve")
        .expect("cycle");
    assert_eq!(resolved.id, november.id);

    let points = app
        .state
        .services
        .usage
        .current_cycle_usage(ACCOUNT, PHONE, at(2024, 11, 15, 12), &Deadline::none())
        .expect("usage");
    let volumes: Vec<_> = points.iter().map(|p| p.usage_mb).collect();
    assert_eq!(volumes, vec![250.5, 180.3, 320.7]);
    assert_eq!(points[0].date, day(2024, 11, 1));
}

#[test]
fn history_against_sqlite_includes_previous_owner() {
    let app = sqlite_app();
    seed_cycle(&app.state, "acct-old", day(2024, 9, 1), day(2024, 9, 30));
    seed_cycle(&app.state, ACCOUNT, day(2024, 11, 1), day(2024, 11, 30));
    seed_cycle(&app.state, ACCOUNT, day(2024, 10, 1), day(2024, 10, 31));

    let history = app
        .state
        .services
        .history
        .cycle_history(ACCOUNT, PHONE, &Deadline::none())
        .expect("history");
    let starts: Vec<_> = history.iter().map(|c| c.start_date).collect();
    assert_eq!(
        starts,
        vec![day(2024, 11, 1), day(2024, 10, 1), day(2024, 9, 1)]
    );
}

#[test]
fn empty_database_yields_no_active_cycle() {
    let app = sqlite_app();
    let err = app
        .state
        .services
        .usage
        .current_cycle_usage(ACCOUNT, PHONE, at(2024, 11, 15, 12), &Deadline::none())
        .expect_err("no cycle");
    let api = ApiError::from(err);
    assert_eq!(api.status, 404);
    assert_eq!(api.code.as_deref(), Some("no_active_cycle"));
}

#[test]
fn expired_deadline_surfaces_as_timeout() {
    let app = sqlite_app();
    seed_cycle(&app.state, ACCOUNT, day(2024, 11, 1), day(2024, 11, 30));

    let err = app
        .state
        .services
        .usage
        .current_cycle_usage(
            ACCOUNT,
            PHONE,
            at(2024, 11, 15, 12),
            &Deadline::after(Duration::ZERO),
        )
        .expect_err("expired");
    assert!(matches!(err, AppError::Store { .. }));
    assert_eq!(ApiError::from(err).status, 504);
}

#[test]
fn health_check_pings_the_database() {
    let app = sqlite_app();
    app.state
        .health_check(&Deadline::none())
        .expect("healthy");

    let cancelled = Deadline::none();
    cancelled.cancel();
    let err = app
        .state
        .health_check(&cancelled)
        .expect_err("cancelled");
    assert_eq!(ApiError::from(err).code.as_deref(), Some("timeout"));
}

#[test]
fn setup_db_is_repeatable() {
    let app = sqlite_app();
    assert!(!app.state.is_fresh_db());
    app.state.setup_db().expect("second setup");
}

#[test]
fn setup_db_reports_unopenable_database_as_store_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = AppState::new(AppConfig::new(dir.path().to_path_buf()));

    let err = state.setup_db().expect_err("directory is not a database");
    assert!(matches!(err, AppError::Store { operation: "migrate", .. }));
    assert!(err.is_infrastructure());
    assert_eq!(ApiError::from(err).status, 503);
}
