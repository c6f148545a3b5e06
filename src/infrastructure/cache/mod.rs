pub mod cache_keys;
pub mod in_memory;

use crate::core::balance::PairwiseDebt;
use crate::core::errors::SplitbookError;
use async_trait::async_trait;

/// Cache for computed balance snapshots. Mutating operations on a group must
/// invalidate its entry so readers re-derive from the source records.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get_group_balances(
        &self,
        group_id: &str,
    ) -> Result<Option<Vec<PairwiseDebt>>, SplitbookError>;
    async fn save_group_balances(
        &self,
        group_id: &str,
        balances: &[PairwiseDebt],
        ttl: std::time::Duration,
    ) -> Result<(), SplitbookError>;
    async fn invalidate_group_balances(&self, group_id: &str) -> Result<(), SplitbookError>;
}
