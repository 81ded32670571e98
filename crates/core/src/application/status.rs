// Status Reporter
//
// Every snapshot drains the timestamp samples it reports. The drain pops by
// count from the head while enqueues append at the tail, so a sample is
// reported by exactly one snapshot.

use crate::application::registry;
use crate::domain::{keys, StatusSnapshot};
use crate::error::{AppError, Result};
use crate::port::{KeyValueStore, TimeProvider};
use tracing::{debug, info, warn};

/// Execute snapshot use case
pub async fn execute(
    store: &dyn KeyValueStore,
    clock: &dyn TimeProvider,
) -> Result<StatusSnapshot> {
    let timestamps_ns = drain_timestamps(store).await?;
    let fractional_value = fractional_probability(store).await?;

    let active_queues = registry::active_members(store).await?;
    let mut active_queue_sizes = Vec::with_capacity(active_queues.len());
    for queue_id in &active_queues {
        active_queue_sizes.push(store.list_len(queue_id).await?);
    }

    // An id can sit in both sets mid drop or after a partial re-add; its
    // backlog is already counted on the active side.
    let (removed_queues, removed_queue_sizes): (Vec<_>, Vec<_>) =
        registry::list_removed_non_empty(store)
            .await?
            .into_iter()
            .filter(|(queue_id, _)| !active_queues.contains(queue_id))
            .unzip();

    let total_items =
        active_queue_sizes.iter().sum::<u64>() + removed_queue_sizes.iter().sum::<u64>();

    let snapshot = StatusSnapshot {
        timestamps_ns,
        active_count: active_queues.len(),
        active_queues,
        active_queue_sizes,
        removed_queues,
        removed_queue_sizes,
        total_items,
        current_time_ns: clock.now_nanos(),
        fractional_value,
    };

    debug!(
        samples = snapshot.timestamps_ns.len(),
        active = snapshot.active_count,
        removed = snapshot.removed_queues.len(),
        total_items = snapshot.total_items,
        "Status snapshot taken"
    );

    Ok(snapshot)
}

/// Pop every sample present at read time and return the parsable ones.
///
/// Entries that are not decimal `i64` values are dropped from the list but
/// left out of the result.
pub async fn drain_timestamps(store: &dyn KeyValueStore) -> Result<Vec<i64>> {
    let observed = store.list_range(keys::MONITOR_TIMESTAMPS, 0, -1).await?;
    if observed.is_empty() {
        return Ok(Vec::new());
    }

    let popped = store
        .list_pop_front_n(keys::MONITOR_TIMESTAMPS, observed.len() as u64)
        .await?;

    Ok(popped
        .into_iter()
        .filter_map(|raw| match raw.parse::<i64>() {
            Ok(ns) => Some(ns),
            Err(e) => {
                warn!(sample = %raw, error = %e, "Skipping unparsable timestamp sample");
                None
            }
        })
        .collect())
}

/// Externally configured fractional probability (0.0 when unset)
pub async fn fractional_probability(store: &dyn KeyValueStore) -> Result<f64> {
    match store.get_scalar(keys::FRACTIONAL_PROBABILITY).await? {
        None => Ok(0.0),
        Some(raw) => raw.trim().parse::<f64>().map_err(|e| {
            AppError::InvalidState(format!(
                "{} holds non-numeric value {:?}: {}",
                keys::FRACTIONAL_PROBABILITY,
                raw,
                e
            ))
        }),
    }
}

/// Store a new fractional probability. Only the admin surface calls this;
/// snapshots and enqueues never write it.
pub async fn set_fractional_probability(store: &dyn KeyValueStore, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(AppError::InvalidArgument(format!(
            "fractional probability must be within [0, 1], got {}",
            value
        )));
    }

    store
        .set_scalar(keys::FRACTIONAL_PROBABILITY, &value.to_string())
        .await?;
    info!(value, "Fractional probability updated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::enqueue::{self, EnqueueRequest};
    use crate::port::random_source::mocks::ScriptedRandomSource;
    use crate::port::time_provider::mocks::ManualClock;
    use crate::port::{InMemoryStore, ThreadRandomSource};
    use std::collections::HashSet;
    use std::sync::Arc;

    const T0: i64 = 1_700_000_000_000_000_000;

    fn request(query_id: i64) -> EnqueueRequest {
        EnqueueRequest {
            payload: "p".to_string(),
            producer_sent_time: 1.0,
            query_id,
        }
    }

    #[tokio::test]
    async fn test_empty_store_snapshot() {
        let store = InMemoryStore::new();
        let clock = ManualClock::new(T0);

        let snapshot = execute(&store, &clock).await.unwrap();

        assert!(snapshot.timestamps_ns.is_empty());
        assert!(snapshot.active_queues.is_empty());
        assert!(snapshot.removed_queues.is_empty());
        assert_eq!(snapshot.total_items, 0);
        assert_eq!(snapshot.active_count, 0);
        assert_eq!(snapshot.current_time_ns, T0);
        assert_eq!(snapshot.fractional_value, 0.0);
    }

    #[tokio::test]
    async fn test_second_snapshot_has_no_samples() {
        let store = InMemoryStore::new();
        registry::add_queue(&store, "q").await.unwrap();
        let random = ScriptedRandomSource::new([(0, 1)]);
        let clock = ManualClock::with_step(T0, 10);

        for i in 0..3 {
            enqueue::execute(&store, &random, &clock, request(i)).await.unwrap();
        }

        let first = execute(&store, &clock).await.unwrap();
        assert_eq!(first.timestamps_ns, vec![T0, T0 + 10, T0 + 20]);
        assert_eq!(first.active_length("q"), Some(3));
        assert_eq!(first.total_items, 3);

        let second = execute(&store, &clock).await.unwrap();
        assert!(second.timestamps_ns.is_empty());
        assert_eq!(second.total_items, 3);
    }

    #[tokio::test]
    async fn test_totals_include_removed_backlog() {
        let store = InMemoryStore::new();
        registry::add_queue(&store, "a").await.unwrap();
        registry::add_queue(&store, "b").await.unwrap();
        for i in 0..4 {
            store.list_push_back("a", &i.to_string()).await.unwrap();
        }
        store.list_push_back("b", "0").await.unwrap();
        registry::drop_queue(&store, "a").await.unwrap();
        registry::drop_queue(&store, "drained").await.unwrap();
        let clock = ManualClock::new(T0);

        let snapshot = execute(&store, &clock).await.unwrap();

        assert_eq!(snapshot.active_queues, vec!["b"]);
        assert_eq!(snapshot.active_queue_sizes, vec![1]);
        assert_eq!(snapshot.removed_queues, vec!["a"]);
        assert_eq!(snapshot.removed_queue_sizes, vec![4]);
        assert_eq!(snapshot.total_items, 5);
        assert_eq!(snapshot.active_count, 1);
        assert!(!store
            .set_is_member(keys::REMOVED_QUEUES, "drained")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_reactivated_backlog_counted_once() {
        let store = InMemoryStore::new();
        registry::add_queue(&store, "a").await.unwrap();
        for i in 0..3 {
            store.list_push_back("a", &i.to_string()).await.unwrap();
        }
        registry::drop_queue(&store, "a").await.unwrap();
        registry::add_queue(&store, "a").await.unwrap();
        let clock = ManualClock::new(T0);

        let snapshot = execute(&store, &clock).await.unwrap();
        assert_eq!(snapshot.active_length("a"), Some(3));
        assert_eq!(snapshot.removed_length("a"), None);
        assert_eq!(snapshot.total_items, 3);
    }

    #[tokio::test]
    async fn test_queue_in_both_sets_counted_once() {
        let store = InMemoryStore::new();
        for i in 0..3 {
            store.list_push_back("a", &i.to_string()).await.unwrap();
        }
        store.set_add(keys::ACTIVE_QUEUES, "a").await.unwrap();
        store.set_add(keys::REMOVED_QUEUES, "a").await.unwrap();
        let clock = ManualClock::new(T0);

        let snapshot = execute(&store, &clock).await.unwrap();
        assert_eq!(snapshot.active_queues, vec!["a"]);
        assert_eq!(snapshot.active_queue_sizes, vec![3]);
        assert!(snapshot.removed_queues.is_empty());
        assert!(snapshot.removed_queue_sizes.is_empty());
        assert_eq!(snapshot.total_items, 3);
    }

    #[tokio::test]
    async fn test_unparsable_samples_are_drained_but_skipped() {
        let store = InMemoryStore::new();
        for raw in ["10", "garbage", "30"] {
            store
                .list_push_back(keys::MONITOR_TIMESTAMPS, raw)
                .await
                .unwrap();
        }

        assert_eq!(drain_timestamps(&store).await.unwrap(), vec![10, 30]);
        assert_eq!(store.list_len(keys::MONITOR_TIMESTAMPS).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_fractional_probability() {
        let store = InMemoryStore::new();
        assert_eq!(fractional_probability(&store).await.unwrap(), 0.0);

        store
            .set_scalar(keys::FRACTIONAL_PROBABILITY, "0.25")
            .await
            .unwrap();
        assert_eq!(fractional_probability(&store).await.unwrap(), 0.25);

        let clock = ManualClock::new(T0);
        assert_eq!(execute(&store, &clock).await.unwrap().fractional_value, 0.25);
        // Reporting never mutates the value
        assert_eq!(
            store
                .get_scalar(keys::FRACTIONAL_PROBABILITY)
                .await
                .unwrap()
                .as_deref(),
            Some("0.25")
        );
    }

    #[tokio::test]
    async fn test_set_fractional_probability() {
        let store = InMemoryStore::new();
        set_fractional_probability(&store, 0.75).await.unwrap();
        assert_eq!(fractional_probability(&store).await.unwrap(), 0.75);

        set_fractional_probability(&store, 0.0).await.unwrap();
        assert_eq!(fractional_probability(&store).await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_out_of_range_fractional_probability_is_rejected() {
        let store = InMemoryStore::new();
        set_fractional_probability(&store, 0.5).await.unwrap();

        for value in [-0.1, 1.5, f64::NAN, f64::INFINITY] {
            let err = set_fractional_probability(&store, value).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidArgument(_)), "{}", value);
        }
        assert_eq!(fractional_probability(&store).await.unwrap(), 0.5);
    }

    #[tokio::test]
    async fn test_unparsable_fractional_probability_is_invalid_state() {
        let store = InMemoryStore::new();
        store
            .set_scalar(keys::FRACTIONAL_PROBABILITY, "half")
            .await
            .unwrap();
        let clock = ManualClock::new(T0);

        let err = execute(&store, &clock).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let store = InMemoryStore::new();
        store.set_unavailable(true);
        let clock = ManualClock::new(T0);

        let err = execute(&store, &clock).await.unwrap_err();
        assert!(matches!(err, AppError::StorageUnavailable(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_snapshots_never_lose_or_double_count() {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(ManualClock::with_step(T0, 1));
        registry::add_queue(store.as_ref(), "a").await.unwrap();
        registry::add_queue(store.as_ref(), "b").await.unwrap();

        const PRODUCERS: i64 = 4;
        const PER_PRODUCER: i64 = 250;

        let mut producers = Vec::new();
        for p in 0..PRODUCERS {
            let store = store.clone();
            let clock = clock.clone();
            producers.push(tokio::spawn(async move {
                for i in 0..PER_PRODUCER {
                    enqueue::execute(
                        store.as_ref(),
                        &ThreadRandomSource,
                        clock.as_ref(),
                        request(p * PER_PRODUCER + i),
                    )
                    .await
                    .unwrap();
                    tokio::task::yield_now().await;
                }
            }));
        }

        let mut reporters = Vec::new();
        for _ in 0..3 {
            let store = store.clone();
            let clock = clock.clone();
            reporters.push(tokio::spawn(async move {
                let mut seen = Vec::new();
                for _ in 0..50 {
                    let snapshot = execute(store.as_ref(), clock.as_ref()).await.unwrap();
                    seen.extend(snapshot.timestamps_ns);
                    tokio::task::yield_now().await;
                }
                seen
            }));
        }

        for producer in producers {
            producer.await.unwrap();
        }
        let mut reported = Vec::new();
        for reporter in reporters {
            reported.extend(reporter.await.unwrap());
        }
        reported.extend(execute(store.as_ref(), clock.as_ref()).await.unwrap().timestamps_ns);

        let unique: HashSet<i64> = reported.iter().copied().collect();
        assert_eq!(reported.len() as i64, PRODUCERS * PER_PRODUCER);
        assert_eq!(unique.len(), reported.len());
    }
}
