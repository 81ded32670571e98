// In-memory KeyValueStore
// Used by tests and by single-process deployments (storage.backend = "memory")

use crate::error::{AppError, Result};
use crate::port::storage::{resolve_range, KeyValueStore};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct MemoryState {
    lists: HashMap<String, VecDeque<String>>,
    sets: HashMap<String, BTreeSet<String>>,
    scalars: HashMap<String, String>,
}

/// Process-local store with the same primitive semantics as the durable
/// adapters. Set members are returned in ascending order.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
    unavailable: AtomicBool,
    writes: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage: every call fails with StorageUnavailable until reset
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of mutating calls served so far
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::StorageUnavailable(
                "in-memory store marked unavailable".to_string(),
            ));
        }
        self.state
            .lock()
            .map_err(|_| AppError::StorageUnavailable("in-memory store lock poisoned".to_string()))
    }

    fn state_for_write(&self) -> Result<MutexGuard<'_, MemoryState>> {
        let guard = self.state()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(guard)
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn list_push_back(&self, key: &str, value: &str) -> Result<()> {
        let mut state = self.state_for_write()?;
        state
            .lists
            .entry(key.to_string())
            .or_default()
            .push_back(value.to_string());
        Ok(())
    }

    async fn list_push_front(&self, key: &str, value: &str) -> Result<()> {
        let mut state = self.state_for_write()?;
        state
            .lists
            .entry(key.to_string())
            .or_default()
            .push_front(value.to_string());
        Ok(())
    }

    async fn list_pop_front(&self, key: &str) -> Result<Option<String>> {
        let mut state = self.state_for_write()?;
        let Some(list) = state.lists.get_mut(key) else {
            return Ok(None);
        };
        let value = list.pop_front();
        if list.is_empty() {
            state.lists.remove(key);
        }
        Ok(value)
    }

    async fn list_pop_front_n(&self, key: &str, count: u64) -> Result<Vec<String>> {
        let mut state = self.state_for_write()?;
        let Some(list) = state.lists.get_mut(key) else {
            return Ok(Vec::new());
        };
        let take = (count as usize).min(list.len());
        let popped: Vec<String> = list.drain(..take).collect();
        if list.is_empty() {
            state.lists.remove(key);
        }
        Ok(popped)
    }

    async fn list_len(&self, key: &str) -> Result<u64> {
        let state = self.state()?;
        Ok(state.lists.get(key).map_or(0, |l| l.len() as u64))
    }

    async fn list_range(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>> {
        let state = self.state()?;
        let Some(list) = state.lists.get(key) else {
            return Ok(Vec::new());
        };
        Ok(list
            .range(resolve_range(list.len(), start, stop))
            .cloned()
            .collect())
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<()> {
        let mut state = self.state_for_write()?;
        state
            .sets
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string());
        Ok(())
    }

    async fn set_remove(&self, key: &str, member: &str) -> Result<()> {
        let mut state = self.state_for_write()?;
        if let Some(set) = state.sets.get_mut(key) {
            set.remove(member);
            if set.is_empty() {
                state.sets.remove(key);
            }
        }
        Ok(())
    }

    async fn set_is_member(&self, key: &str, member: &str) -> Result<bool> {
        let state = self.state()?;
        Ok(state.sets.get(key).is_some_and(|s| s.contains(member)))
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>> {
        let state = self.state()?;
        Ok(state
            .sets
            .get(key)
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn get_scalar(&self, key: &str) -> Result<Option<String>> {
        let state = self.state()?;
        Ok(state.scalars.get(key).cloned())
    }

    async fn set_scalar(&self, key: &str, value: &str) -> Result<()> {
        let mut state = self.state_for_write()?;
        state.scalars.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_order_and_pop() {
        let store = InMemoryStore::new();
        store.list_push_back("l", "b").await.unwrap();
        store.list_push_back("l", "c").await.unwrap();
        store.list_push_front("l", "a").await.unwrap();

        assert_eq!(store.list_len("l").await.unwrap(), 3);
        assert_eq!(
            store.list_range("l", 0, -1).await.unwrap(),
            vec!["a", "b", "c"]
        );
        assert_eq!(store.list_pop_front("l").await.unwrap().as_deref(), Some("a"));
        assert_eq!(store.list_len("l").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_pop_front_n_is_bounded_by_length() {
        let store = InMemoryStore::new();
        for v in ["1", "2", "3"] {
            store.list_push_back("l", v).await.unwrap();
        }

        assert_eq!(store.list_pop_front_n("l", 2).await.unwrap(), vec!["1", "2"]);
        assert_eq!(store.list_range("l", 0, -1).await.unwrap(), vec!["3"]);
        assert_eq!(store.list_pop_front_n("l", 10).await.unwrap(), vec!["3"]);
        assert!(store.list_pop_front_n("missing", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sets_are_idempotent_and_sorted() {
        let store = InMemoryStore::new();
        store.set_add("s", "b").await.unwrap();
        store.set_add("s", "a").await.unwrap();
        store.set_add("s", "a").await.unwrap();

        assert_eq!(store.set_members("s").await.unwrap(), vec!["a", "b"]);
        assert!(store.set_is_member("s", "a").await.unwrap());

        store.set_remove("s", "a").await.unwrap();
        store.set_remove("s", "a").await.unwrap();
        assert!(!store.set_is_member("s", "a").await.unwrap());
    }

    #[tokio::test]
    async fn test_scalars() {
        let store = InMemoryStore::new();
        assert_eq!(store.get_scalar("k").await.unwrap(), None);
        store.set_scalar("k", "0.5").await.unwrap();
        assert_eq!(store.get_scalar("k").await.unwrap().as_deref(), Some("0.5"));
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_call() {
        let store = InMemoryStore::new();
        store.set_unavailable(true);

        let err = store.list_len("l").await.unwrap_err();
        assert!(matches!(err, AppError::StorageUnavailable(_)));
        assert!(store.set_add("s", "x").await.is_err());

        store.set_unavailable(false);
        assert!(store.set_add("s", "x").await.is_ok());
    }

    #[tokio::test]
    async fn test_write_count_ignores_reads() {
        let store = InMemoryStore::new();
        store.set_members("s").await.unwrap();
        store.list_len("l").await.unwrap();
        assert_eq!(store.write_count(), 0);

        store.list_push_back("l", "v").await.unwrap();
        assert_eq!(store.write_count(), 1);
    }
}
