use crate::core::balance::PairwiseDebt;
use crate::core::errors::SplitbookError;
use crate::infrastructure::cache::{Cache, cache_keys};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct InMemoryCache {
    cache: Arc<RwLock<HashMap<String, (Vec<PairwiseDebt>, chrono::DateTime<chrono::Utc>)>>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        InMemoryCache {
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get_group_balances(
        &self,
        group_id: &str,
    ) -> Result<Option<Vec<PairwiseDebt>>, SplitbookError> {
        let cache = self.cache.read().await;
        let key = cache_keys::group_balances_key(group_id);
        Ok(cache
            .get(&key)
            .filter(|(_, expiry)| *expiry > chrono::Utc::now())
            .map(|(balances, _)| balances.clone()))
    }

    async fn save_group_balances(
        &self,
        group_id: &str,
        balances: &[PairwiseDebt],
        ttl: std::time::Duration,
    ) -> Result<(), SplitbookError> {
        let mut cache = self.cache.write().await;
        let key = cache_keys::group_balances_key(group_id);
        let expiry = chrono::Utc::now()
            + chrono::Duration::from_std(ttl)
                .map_err(|e| SplitbookError::CacheError(format!("Failed to convert TTL: {}", e)))?;
        cache.insert(key, (balances.to_vec(), expiry));
        Ok(())
    }

    async fn invalidate_group_balances(&self, group_id: &str) -> Result<(), SplitbookError> {
        let mut cache = self.cache.write().await;
        cache.remove(&cache_keys::group_balances_key(group_id));
        Ok(())
    }
}
