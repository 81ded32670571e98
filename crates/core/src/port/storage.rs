// Storage Port (Interface)
//
// Every method is a single atomic primitive of the backing store.
// Multi-step sequences built on top of them are NOT transactional.

use crate::error::Result;
use async_trait::async_trait;
use std::ops::Range;

/// Key-value store offering atomic list, set and scalar primitives
///
/// Implementations map every backend failure (connection loss, timeout,
/// protocol error) to `AppError::StorageUnavailable` and never retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Append a value at the tail of a list
    async fn list_push_back(&self, key: &str, value: &str) -> Result<()>;

    /// Prepend a value at the head of a list
    async fn list_push_front(&self, key: &str, value: &str) -> Result<()>;

    /// Pop the head of a list (None if empty or missing)
    async fn list_pop_front(&self, key: &str) -> Result<Option<String>>;

    /// Pop up to `count` entries from the head of a list
    ///
    /// # Returns
    /// The popped values, head first
    async fn list_pop_front_n(&self, key: &str, count: u64) -> Result<Vec<String>> {
        let mut popped = Vec::new();
        while (popped.len() as u64) < count {
            match self.list_pop_front(key).await? {
                Some(value) => popped.push(value),
                None => break,
            }
        }
        Ok(popped)
    }

    /// Length of a list (0 if missing)
    async fn list_len(&self, key: &str) -> Result<u64>;

    /// Inclusive range of a list; negative indices count from the tail
    ///
    /// # Example
    /// ```text
    /// store.list_range("real_timestamp", 0, -1).await?; // whole list
    /// ```
    async fn list_range(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>>;

    /// Add a member to a set (no-op if present)
    async fn set_add(&self, key: &str, member: &str) -> Result<()>;

    /// Remove a member from a set (no-op if absent)
    async fn set_remove(&self, key: &str, member: &str) -> Result<()>;

    async fn set_is_member(&self, key: &str, member: &str) -> Result<bool>;

    /// All members of a set
    async fn set_members(&self, key: &str) -> Result<Vec<String>>;

    async fn get_scalar(&self, key: &str) -> Result<Option<String>>;

    async fn set_scalar(&self, key: &str, value: &str) -> Result<()>;
}

/// Resolve an inclusive, possibly negative `[start, stop]` pair against a
/// list of `len` entries.
///
/// Returns an empty range when the request falls outside the list.
pub fn resolve_range(len: usize, start: i64, stop: i64) -> Range<usize> {
    let len_i = len as i64;
    let start = if start < 0 {
        (len_i + start).max(0)
    } else {
        start
    };
    let stop = if stop < 0 {
        len_i + stop
    } else {
        stop.min(len_i - 1)
    };

    if len == 0 || start > stop || start >= len_i {
        return 0..0;
    }

    start as usize..(stop as usize + 1)
}
