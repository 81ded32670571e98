// Consumer-side reads
//
// Items are returned in their serialized form. Consumers stamp and strip
// fields themselves before handing the record back through `complete`.

use crate::domain::keys;
use crate::error::Result;
use crate::port::KeyValueStore;

/// Pop the oldest item of a queue. Works for active and removed queues alike.
pub async fn pop_item(store: &dyn KeyValueStore, queue_id: &str) -> Result<Option<String>> {
    store.list_pop_front(queue_id).await
}

/// Pop the most recently completed record
pub async fn pop_completed(store: &dyn KeyValueStore) -> Result<Option<String>> {
    store.list_pop_front(keys::COMPLETION_QUEUE).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::InMemoryStore;

    #[tokio::test]
    async fn test_pop_item_is_fifo() {
        let store = InMemoryStore::new();
        store.list_push_back("q", "first").await.unwrap();
        store.list_push_back("q", "second").await.unwrap();

        assert_eq!(pop_item(&store, "q").await.unwrap().as_deref(), Some("first"));
        assert_eq!(pop_item(&store, "q").await.unwrap().as_deref(), Some("second"));
        assert_eq!(pop_item(&store, "q").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_pop_completed_returns_newest_first() {
        let store = InMemoryStore::new();
        store
            .list_push_front(keys::COMPLETION_QUEUE, "older")
            .await
            .unwrap();
        store
            .list_push_front(keys::COMPLETION_QUEUE, "newer")
            .await
            .unwrap();

        assert_eq!(pop_completed(&store).await.unwrap().as_deref(), Some("newer"));
        assert_eq!(pop_completed(&store).await.unwrap().as_deref(), Some("older"));
        assert_eq!(pop_completed(&store).await.unwrap(), None);
    }
}
