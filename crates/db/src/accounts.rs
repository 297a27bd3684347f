use chrono::Utc;
use rusqlite::{OptionalExtension, TransactionBehavior, params};
use usage_core::{Account, AccountChanges, CreateOutcome, NewAccount, UpdateOutcome};

use crate::Db;
use crate::error::{DbError, Result};
use crate::helpers::{ACCOUNT_COLUMNS, new_id, row_to_account};

impl Db {
    /// Inserts unless the email is taken. The unique index on `email` decides,
    /// so two racing creates cannot both succeed.
    pub fn create_account_if_absent(&self, account: &NewAccount) -> Result<CreateOutcome<Account>> {
        let now = Utc::now();
        let stored = Account {
            id: new_id(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            email: account.email.clone(),
            password_hash: account.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        let inserted = self.conn.execute(
            r#"
            INSERT INTO account (
              id, first_name, last_name, email, password_hash, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT (email) DO NOTHING
            "#,
            params![
                stored.id,
                stored.first_name,
                stored.last_name,
                stored.email,
                stored.password_hash,
                stored.created_at,
                stored.updated_at,
            ],
        )?;
        if inserted == 0 {
            return Ok(CreateOutcome::AlreadyExists);
        }
        Ok(CreateOutcome::Created(stored))
    }

    pub fn get_account_by_id(&self, id: &str) -> Result<Option<Account>> {
        self.conn
            .query_row(
                &format!("SELECT {ACCOUNT_COLUMNS} FROM account WHERE id = ?1"),
                params![id],
                row_to_account,
            )
            .optional()
            .map_err(DbError::from)
    }

    pub fn get_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        self.conn
            .query_row(
                &format!("SELECT {ACCOUNT_COLUMNS} FROM account WHERE email = ?1"),
                params![email],
                row_to_account,
            )
            .optional()
            .map_err(DbError::from)
    }

    pub fn update_account(
        &mut self,
        id: &str,
        changes: &AccountChanges,
    ) -> Result<UpdateOutcome<Account>> {
        // Write lock up front so lock waits go through busy_timeout.
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let existing = tx
            .query_row(
                &format!("SELECT {ACCOUNT_COLUMNS} FROM account WHERE id = ?1"),
                params![id],
                row_to_account,
            )
            .optional()?;
        let Some(mut account) = existing else {
            return Ok(UpdateOutcome::NotFound);
        };
        if let Some(ref first_name) = changes.first_name {
            account.first_name = first_name.clone();
        }
        if let Some(ref last_name) = changes.last_name {
            account.last_name = last_name.clone();
        }
        if let Some(ref email) = changes.email {
            account.email = email.clone();
        }
        if let Some(ref password_hash) = changes.password_hash {
            account.password_hash = password_hash.clone();
        }
        account.updated_at = Utc::now();
        let updated = tx.execute(
            r#"
            UPDATE account
            SET first_name = ?1, last_name = ?2, email = ?3, password_hash = ?4, updated_at = ?5
            WHERE id = ?6
            "#,
            params![
                account.first_name,
                account.last_name,
                account.email,
                account.password_hash,
                account.updated_at,
                account.id,
            ],
        );
        match updated.map_err(DbError::from) {
            Ok(_) => {}
            Err(err) if err.is_constraint_violation() => return Ok(UpdateOutcome::Conflict),
            Err(err) => return Err(err),
        }
        tx.commit()?;
        Ok(UpdateOutcome::Updated(account))
    }
}
