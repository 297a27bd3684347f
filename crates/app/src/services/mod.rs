mod accounts;
mod cycles;
mod history;
mod usage;

use crate::error::{AppError, Result};
use crate::stores::Stores;

pub use accounts::{AccountInput, AccountPatch, AccountService};
pub use cycles::CycleResolver;
pub use history::HistoryProjector;
pub use usage::UsageAggregator;

/// Service registry for app-level operations.
#[derive(Clone)]
pub struct AppServices {
    pub cycles: CycleResolver,
    pub usage: UsageAggregator,
    pub history: HistoryProjector,
    pub accounts: AccountService,
}

impl AppServices {
    pub fn new(stores: Stores) -> Self {
        let cycles = CycleResolver::new(stores.cycles.clone());
        Self {
            usage: UsageAggregator::new(cycles.clone(), stores.usage),
            history: HistoryProjector::new(stores.cycles),
            accounts: AccountService::new(stores.accounts),
            cycles,
        }
    }
}

/// Trims `value` and rejects it when nothing is left.
fn require<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(format!("{field} is required")));
    }
    Ok(trimmed)
}
