use chrono::{NaiveDate, Utc};
use rusqlite::{OptionalExtension, params};
use usage_core::{DailyUsageRecord, NewDailyUsage};

use crate::Db;
use crate::error::{DbError, Result};
use crate::helpers::{USAGE_COLUMNS, new_id, row_to_usage};

fn check_volume(used_mb: f64) -> Result<()> {
    if !used_mb.is_finite() || used_mb < 0.0 {
        return Err(DbError::InvalidRecord(format!(
            "usage volume must be a non-negative number of megabytes, got {used_mb}"
        )));
    }
    Ok(())
}

impl Db {
    /// Fails with a constraint violation when the tenancy already has a record
    /// for that day.
    pub fn insert_daily_usage(&self, usage: &NewDailyUsage) -> Result<DailyUsageRecord> {
        check_volume(usage.used_mb)?;
        if usage.phone_number.trim().is_empty() || usage.account_id.trim().is_empty() {
            return Err(DbError::InvalidRecord(
                "usage requires a phone number and an account".to_string(),
            ));
        }
        let now = Utc::now();
        let stored = DailyUsageRecord {
            id: new_id(),
            phone_number: usage.phone_number.clone(),
            account_id: usage.account_id.clone(),
            usage_date: usage.usage_date,
            used_mb: usage.used_mb,
            created_at: now,
            updated_at: now,
        };
        self.conn.execute(
            r#"
            INSERT INTO daily_usage (
              id, phone_number, account_id, usage_date, used_mb, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                stored.id,
                stored.phone_number,
                stored.account_id,
                stored.usage_date,
                stored.used_mb,
                stored.created_at,
                stored.updated_at,
            ],
        )?;
        Ok(stored)
    }

    pub fn get_daily_usage_by_id(&self, id: &str) -> Result<Option<DailyUsageRecord>> {
        self.conn
            .query_row(
                &format!("SELECT {USAGE_COLUMNS} FROM daily_usage WHERE id = ?1"),
                params![id],
                row_to_usage,
            )
            .optional()
            .map_err(DbError::from)
    }

    /// Records for one tenancy with `start <= usage_date <= end`, oldest first.
    pub fn usage_in_range(
        &self,
        account_id: &str,
        phone_number: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyUsageRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {USAGE_COLUMNS}
            FROM daily_usage
            WHERE account_id = ?1
              AND phone_number = ?2
              AND usage_date >= ?3
              AND usage_date <= ?4
            ORDER BY usage_date ASC
            "#
        ))?;
        let rows = stmt
            .query_map(params![account_id, phone_number, start, end], row_to_usage)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Volume correction. Returns `None` when no record has that id.
    pub fn update_daily_usage(&self, id: &str, used_mb: f64) -> Result<Option<DailyUsageRecord>> {
        check_volume(used_mb)?;
        let changed = self.conn.execute(
            "UPDATE daily_usage SET used_mb = ?1, updated_at = ?2 WHERE id = ?3",
            params![used_mb, Utc::now(), id],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        self.get_daily_usage_by_id(id)
    }
}
