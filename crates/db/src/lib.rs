mod accounts;
mod cycles;
mod daily_usage;
mod error;
mod helpers;
mod migrations;

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;
use usage_core::Deadline;

pub use error::{DbError, Result};
pub use migrations::MIGRATION_NAMES;

/// SQLite virtual-machine steps between deadline checks.
const PROGRESS_CHECK_OPS: i32 = 1_000;

pub struct Db {
    conn: Connection,
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "temp_store", "MEMORY")?;
        conn.pragma_update(None, "cache_size", -20_000)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn })
    }

    /// Ties every statement run on this connection to `deadline`.
    ///
    /// Lock waits are capped at `busy_timeout` or whatever is left of the
    /// deadline, and running statements are interrupted once it expires or is
    /// cancelled. Map the resulting errors with [`DbError::resolve_interrupt`].
    pub fn bind_deadline(&mut self, deadline: &Deadline, busy_timeout: Duration) -> Result<()> {
        if let Some(reason) = deadline.interruption() {
            return Err(reason.into());
        }
        let wait = deadline
            .remaining()
            .map_or(busy_timeout, |left| left.min(busy_timeout));
        self.conn.busy_timeout(wait)?;
        let watched = deadline.clone();
        self.conn.progress_handler(
            PROGRESS_CHECK_OPS,
            Some(move || watched.interruption().is_some()),
        );
        Ok(())
    }

    pub fn ping(&self) -> Result<()> {
        self.conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    /// Raw access for maintenance scripts and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
