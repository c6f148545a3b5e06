pub mod api;
pub mod config;
pub mod constants;
pub mod core;
pub mod infrastructure;
pub mod parse;

pub use crate::core::balance::{PairwiseDebt, compute_balances};
pub use crate::core::errors::SplitbookError;
pub use crate::core::recurring::{RecurringGroup, RecurringReport, detect_recurring};
pub use crate::core::services::SplitbookService;
pub use crate::infrastructure::cache::in_memory::InMemoryCache;
pub use crate::infrastructure::logging::in_memory::InMemoryLogging;
pub use crate::infrastructure::storage::in_memory::InMemoryStorage;

#[cfg(test)]
mod tests;
