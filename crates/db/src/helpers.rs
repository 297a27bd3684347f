use rusqlite::Row;
use usage_core::{Account, BillingCycle, DailyUsageRecord};

pub(crate) const CYCLE_COLUMNS: &str =
    "id, phone_number, start_date, end_date, account_id, created_at";

pub(crate) const USAGE_COLUMNS: &str =
    "id, phone_number, account_id, usage_date, used_mb, created_at, updated_at";

pub(crate) const ACCOUNT_COLUMNS: &str =
    "id, first_name, last_name, email, password_hash, created_at, updated_at";

pub(crate) fn row_to_cycle(row: &Row<'_>) -> std::result::Result<BillingCycle, rusqlite::Error> {
    Ok(BillingCycle {
        id: row.get(0)?,
        phone_number: row.get(1)?,
        start_date: row.get(2)?,
        end_date: row.get(3)?,
        account_id: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub(crate) fn row_to_usage(
    row: &Row<'_>,
) -> std::result::Result<DailyUsageRecord, rusqlite::Error> {
    Ok(DailyUsageRecord {
        id: row.get(0)?,
        phone_number: row.get(1)?,
        account_id: row.get(2)?,
        usage_date: row.get(3)?,
        used_mb: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

pub(crate) fn row_to_account(row: &Row<'_>) -> std::result::Result<Account, rusqlite::Error> {
    Ok(Account {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        password_hash: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
