// Completion Recorder
//
// Completed items are prepended, so the completion list's tail is the oldest
// record and downstream readers pop from the head (newest first).

use crate::domain::{keys, COMPLETION_TIME_FIELD};
use crate::error::{AppError, Result};
use crate::port::{KeyValueStore, TimeProvider};
use serde_json::{Map, Value};
use tracing::debug;

/// Stamp `_4_done_time` onto a serialized item, overwriting any prior value.
///
/// Only JSON objects are accepted. Every other field is kept as-is, so items
/// that did not originate from the enqueue pipeline are recorded too.
pub fn stamp_completion(raw: &str, done_secs: f64) -> Result<String> {
    let mut record: Map<String, Value> = serde_json::from_str(raw).map_err(|e| {
        AppError::MalformedItem(format!("completed item is not a JSON object: {}", e))
    })?;

    record.insert(COMPLETION_TIME_FIELD.to_string(), Value::from(done_secs));

    serde_json::to_string(&record).map_err(|e| AppError::Internal(e.to_string()))
}

/// Execute complete use case
pub async fn execute(
    store: &dyn KeyValueStore,
    clock: &dyn TimeProvider,
    raw: &str,
) -> Result<()> {
    let record = stamp_completion(raw, clock.now_secs())?;
    store.list_push_front(keys::COMPLETION_QUEUE, &record).await?;

    debug!("Completion recorded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::storage::MockKeyValueStore;
    use crate::port::time_provider::mocks::ManualClock;
    use crate::port::InMemoryStore;
    use serde_json::json;

    const T0: i64 = 1_700_000_000_000_000_000;

    #[test]
    fn test_stamp_overwrites_and_keeps_unknown_fields() {
        let raw = r#"{"query_id":5,"_4_done_time":1.0,"worker":"w-7"}"#;
        let stamped: Value = serde_json::from_str(&stamp_completion(raw, 9.5).unwrap()).unwrap();

        assert_eq!(stamped["_4_done_time"], json!(9.5));
        assert_eq!(stamped["query_id"], json!(5));
        assert_eq!(stamped["worker"], json!("w-7"));
    }

    #[test]
    fn test_stamp_rejects_non_objects() {
        for raw in ["not json", "[1,2]", "42", "\"text\"", "null", ""] {
            let err = stamp_completion(raw, 1.0).unwrap_err();
            assert!(matches!(err, AppError::MalformedItem(_)), "input {:?}", raw);
        }
    }

    #[tokio::test]
    async fn test_complete_prepends_to_completion_list() {
        let store = InMemoryStore::new();
        let clock = ManualClock::with_step(T0, 1_000_000_000);

        execute(&store, &clock, r#"{"query_id":1}"#).await.unwrap();
        execute(&store, &clock, r#"{"query_id":2}"#).await.unwrap();

        let records = store.list_range(keys::COMPLETION_QUEUE, 0, -1).await.unwrap();
        assert_eq!(records.len(), 2);
        let newest: Value = serde_json::from_str(&records[0]).unwrap();
        let oldest: Value = serde_json::from_str(&records[1]).unwrap();
        assert_eq!(newest["query_id"], json!(2));
        assert_eq!(oldest["query_id"], json!(1));
        let newest_done = newest["_4_done_time"].as_f64().unwrap();
        let oldest_done = oldest["_4_done_time"].as_f64().unwrap();
        assert!(newest_done > oldest_done);
    }

    #[tokio::test]
    async fn test_malformed_item_leaves_completion_list_unchanged() {
        let store = InMemoryStore::new();
        let clock = ManualClock::new(T0);
        execute(&store, &clock, r#"{"query_id":1}"#).await.unwrap();
        let writes_before = store.write_count();

        let err = execute(&store, &clock, "{broken").await.unwrap_err();

        assert!(matches!(err, AppError::MalformedItem(_)));
        assert_eq!(store.write_count(), writes_before);
        assert_eq!(store.list_len(keys::COMPLETION_QUEUE).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_list_push_front()
            .times(1)
            .returning(|_, _| Err(AppError::StorageUnavailable("connection reset".into())));
        let clock = ManualClock::new(T0);

        let err = execute(&store, &clock, "{}").await.unwrap_err();
        assert!(matches!(err, AppError::StorageUnavailable(_)));
    }
}
