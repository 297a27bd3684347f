use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use usage_core::Deadline;
use usage_db::Db;

use crate::error::{AppError, Result};
use crate::services::AppServices;
use crate::stores::{SqliteStore, Stores};

pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Storage location and per-call limits.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub busy_timeout: Duration,
    /// `None` disables the per-request deadline.
    pub request_timeout: Option<Duration>,
}

impl AppConfig {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
        }
    }
}

/// Application state shared by the frontends (HTTP server, CLI).
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<SqliteStore>,
    pub services: AppServices,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let store = Arc::new(SqliteStore::new(
            config.db_path.clone(),
            config.busy_timeout,
        ));
        let services = AppServices::new(Stores::sqlite(store.clone()));
        Self {
            config,
            store,
            services,
        }
    }

    /// Wires the services against arbitrary stores, keeping `store` for
    /// migrations and health checks.
    pub fn with_stores(config: AppConfig, store: Arc<SqliteStore>, stores: Stores) -> Self {
        Self {
            config,
            store,
            services: AppServices::new(stores),
        }
    }

    pub fn is_fresh_db(&self) -> bool {
        !self.config.db_path.exists()
    }

    pub fn setup_db(&self) -> Result<()> {
        let fresh = self.is_fresh_db();
        self.store.migrate().map_err(|source| {
            AppError::store("migrate", self.config.db_path.display().to_string(), source)
        })?;
        info!(db_path = %self.config.db_path.display(), fresh, "database ready");
        Ok(())
    }

    pub fn open_db(&self) -> Result<Db> {
        Ok(Db::open(&self.config.db_path)?)
    }

    pub fn health_check(&self, deadline: &Deadline) -> Result<()> {
        self.store
            .ping(deadline)
            .map_err(|source| AppError::store("ping", self.config.db_path.display().to_string(), source))
    }

    /// A fresh deadline for one request, bounded by `request_timeout`.
    pub fn request_deadline(&self) -> Deadline {
        match self.config.request_timeout {
            Some(timeout) => Deadline::after(timeout),
            None => Deadline::none(),
        }
    }
}
