pub mod app;
pub mod error;
pub mod services;
pub mod startup;
pub mod stores;
pub mod util;

pub use app::{AppConfig, AppState};
pub use error::{ApiError, AppError, Result};
pub use services::{
    AccountInput, AccountPatch, AccountService, AppServices, CycleResolver, HistoryProjector,
    UsageAggregator,
};
pub use startup::{AppPaths, ensure_app_data_dir};
pub use stores::{AccountStore, CycleStore, SqliteStore, Stores, UsageStore};
pub use util::time::{parse_instant, resolve_instant};
