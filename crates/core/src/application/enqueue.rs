// Enqueue Use Case

use crate::application::{balancer, registry};
use crate::domain::{keys, QueueId, QueueItem};
use crate::error::Result;
use crate::port::time_provider::nanos_to_secs;
use crate::port::{KeyValueStore, RandomSource, TimeProvider};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Enqueue request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnqueueRequest {
    pub payload: String,

    /// Producer-reported send time (seconds since epoch)
    pub producer_sent_time: f64,

    pub query_id: i64,
}

/// Execute enqueue use case
///
/// The steps are independent storage calls, not a transaction. A failure
/// after the timestamp sample is recorded leaves an orphan sample behind.
///
/// # Arguments
///
/// * `store` - Storage port
/// * `random` - Randomness for queue sampling (injected for determinism)
/// * `clock` - Time provider (injected for determinism)
/// * `req` - Enqueue request
///
/// # Returns
/// The queue the item was appended to
pub async fn execute(
    store: &dyn KeyValueStore,
    random: &dyn RandomSource,
    clock: &dyn TimeProvider,
    req: EnqueueRequest,
) -> Result<QueueId> {
    let active = registry::list_active(store).await?;
    let queue_id = balancer::choose_queue(store, random, &active).await?;

    let now_ns = clock.now_nanos();
    store
        .list_push_back(keys::MONITOR_TIMESTAMPS, &now_ns.to_string())
        .await?;

    let item = QueueItem::new(
        req.payload,
        req.query_id,
        req.producer_sent_time,
        nanos_to_secs(now_ns),
    );
    store.list_push_back(&queue_id, &item.to_json()?).await?;

    debug!(queue_id = %queue_id, query_id = req.query_id, "Item enqueued");
    Ok(queue_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::port::random_source::mocks::ScriptedRandomSource;
    use crate::port::time_provider::mocks::ManualClock;
    use crate::port::InMemoryStore;

    const T0: i64 = 1_700_000_000_000_000_000;

    fn request(query_id: i64) -> EnqueueRequest {
        EnqueueRequest {
            payload: "x".repeat(100),
            producer_sent_time: 100.0,
            query_id,
        }
    }

    #[tokio::test]
    async fn test_enqueue_without_active_queue_writes_nothing() {
        let store = InMemoryStore::new();
        let random = ScriptedRandomSource::new([(0, 1)]);
        let clock = ManualClock::new(T0);

        let err = execute(&store, &random, &clock, request(1))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NoActiveQueues));
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.list_len(keys::MONITOR_TIMESTAMPS).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_enqueue_stamps_item_and_records_sample() {
        let store = InMemoryStore::new();
        registry::add_queue(&store, "q").await.unwrap();
        let random = ScriptedRandomSource::new([(0, 1)]);
        let clock = ManualClock::new(T0);

        let queue_id = execute(&store, &random, &clock, request(42)).await.unwrap();
        assert_eq!(queue_id, "q");

        let samples = store
            .list_range(keys::MONITOR_TIMESTAMPS, 0, -1)
            .await
            .unwrap();
        assert_eq!(samples, vec![T0.to_string()]);

        let raw = store.list_pop_front("q").await.unwrap().unwrap();
        let item = QueueItem::from_json(&raw).unwrap();
        assert_eq!(item.query_id, 42);
        assert_eq!(item.sent_time, 100.0);
        assert_eq!(item.enqueue_time, nanos_to_secs(T0));
        assert_eq!(item.payload.as_deref(), Some("x".repeat(100).as_str()));
        assert_eq!(item.dequeue_time, None);
        assert_eq!(item.completion_time, None);
    }

    #[tokio::test]
    async fn test_enqueue_routes_to_shorter_queue() {
        let store = InMemoryStore::new();
        registry::add_queue(&store, "A").await.unwrap();
        registry::add_queue(&store, "B").await.unwrap();
        for i in 0..5 {
            store.list_push_back("A", &i.to_string()).await.unwrap();
        }
        for i in 0..2 {
            store.list_push_back("B", &i.to_string()).await.unwrap();
        }
        let random = ScriptedRandomSource::new([(0, 1)]);
        let clock = ManualClock::new(T0);

        let queue_id = execute(&store, &random, &clock, request(1)).await.unwrap();
        assert_eq!(queue_id, "B");
        assert_eq!(store.list_len("B").await.unwrap(), 3);
        assert_eq!(store.list_len("A").await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_dropped_queue_receives_nothing() {
        let store = InMemoryStore::new();
        registry::add_queue(&store, "keep").await.unwrap();
        registry::add_queue(&store, "gone").await.unwrap();
        registry::drop_queue(&store, "gone").await.unwrap();
        let random = ScriptedRandomSource::new([(0, 1)]);
        let clock = ManualClock::with_step(T0, 1);

        for i in 0..20 {
            let queue_id = execute(&store, &random, &clock, request(i)).await.unwrap();
            assert_eq!(queue_id, "keep");
        }
        assert_eq!(store.list_len("gone").await.unwrap(), 0);
        assert_eq!(store.list_len(keys::MONITOR_TIMESTAMPS).await.unwrap(), 20);
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let store = InMemoryStore::new();
        registry::add_queue(&store, "q").await.unwrap();
        store.set_unavailable(true);
        let random = ScriptedRandomSource::new([(0, 1)]);
        let clock = ManualClock::new(T0);

        let err = execute(&store, &random, &clock, request(1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::StorageUnavailable(_)));
    }
}
