mod balance_tests;

use crate::core::models::member::Member;
use crate::core::services::SplitbookService;
use crate::infrastructure::cache::in_memory::InMemoryCache;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::in_memory::InMemoryStorage;

pub fn create_test_service() -> SplitbookService<InMemoryLogging, InMemoryStorage, InMemoryCache> {
    let storage = InMemoryStorage::new();
    let logging = InMemoryLogging::new();
    let cache = InMemoryCache::new();
    SplitbookService::new(storage, logging, cache)
}

pub fn member(uid: &str, name: &str) -> Member {
    Member {
        uid: uid.to_string(),
        display_name: name.to_string(),
        email: format!("{}@example.com", uid),
        photo_url: None,
    }
}
