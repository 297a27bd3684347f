use chrono::{NaiveDate, Utc};
use rusqlite::{OptionalExtension, params};
use usage_core::{BillingCycle, NewBillingCycle};

use crate::Db;
use crate::error::{DbError, Result};
use crate::helpers::{CYCLE_COLUMNS, new_id, row_to_cycle};

impl Db {
    pub fn insert_cycle(&self, cycle: &NewBillingCycle) -> Result<BillingCycle> {
        if cycle.phone_number.trim().is_empty() || cycle.account_id.trim().is_empty() {
            return Err(DbError::InvalidRecord(
                "cycle requires a phone number and an account".to_string(),
            ));
        }
        if cycle.start_date > cycle.end_date {
            return Err(DbError::InvalidRecord(format!(
                "cycle starts {} after it ends {}",
                cycle.start_date, cycle.end_date
            )));
        }
        let stored = BillingCycle {
            id: new_id(),
            phone_number: cycle.phone_number.clone(),
            start_date: cycle.start_date,
            end_date: cycle.end_date,
            account_id: cycle.account_id.clone(),
            created_at: Utc::now(),
        };
        self.conn.execute(
            r#"
            INSERT INTO billing_cycle (id, phone_number, start_date, end_date, account_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                stored.id,
                stored.phone_number,
                stored.start_date,
                stored.end_date,
                stored.account_id,
                stored.created_at,
            ],
        )?;
        Ok(stored)
    }

    pub fn get_cycle_by_id(&self, id: &str) -> Result<Option<BillingCycle>> {
        self.conn
            .query_row(
                &format!("SELECT {CYCLE_COLUMNS} FROM billing_cycle WHERE id = ?1"),
                params![id],
                row_to_cycle,
            )
            .optional()
            .map_err(DbError::from)
    }

    /// Every cycle ever opened for the number, across all owning accounts,
    /// newest start first.
    pub fn cycles_for_phone_number(&self, phone_number: &str) -> Result<Vec<BillingCycle>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {CYCLE_COLUMNS}
            FROM billing_cycle
            WHERE phone_number = ?1
            ORDER BY start_date DESC, created_at DESC
            "#
        ))?;
        let rows = stmt
            .query_map(params![phone_number], row_to_cycle)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn cycles_for_account(&self, account_id: &str) -> Result<Vec<BillingCycle>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {CYCLE_COLUMNS}
            FROM billing_cycle
            WHERE account_id = ?1
            ORDER BY start_date DESC, created_at DESC
            "#
        ))?;
        let rows = stmt
            .query_map(params![account_id], row_to_cycle)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Cycles of one tenancy whose inclusive range contains `day`, newest start
    /// first. More than one row means overlapping upstream data.
    pub fn active_cycles(
        &self,
        account_id: &str,
        phone_number: &str,
        day: NaiveDate,
    ) -> Result<Vec<BillingCycle>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {CYCLE_COLUMNS}
            FROM billing_cycle
            WHERE account_id = ?1
              AND phone_number = ?2
              AND start_date <= ?3
              AND end_date >= ?3
            ORDER BY start_date DESC, created_at DESC
            "#
        ))?;
        let rows = stmt
            .query_map(params![account_id, phone_number, day], row_to_cycle)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
