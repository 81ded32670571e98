// Queue Registry - active/removed membership and lazy GC of drained queues
//
// Membership changes are ordered so that a concurrent reader never sees an
// id missing from both sets; it may briefly see it in both.

use crate::domain::{keys, QueueId};
use crate::error::{AppError, Result};
use crate::port::KeyValueStore;
use tracing::{debug, info, warn};

/// Result of the read phase of `list_removed_non_empty`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovedScan {
    /// Removed queues still holding items, with their observed lengths
    pub non_empty: Vec<(QueueId, u64)>,
    /// Removed queues observed empty; candidates for garbage collection
    pub drained: Vec<QueueId>,
}

/// Make a queue eligible for new items.
///
/// Re-adding a dropped queue reactivates it: the id is inserted into the
/// active set first and only then cleared from the removed set.
pub async fn add_queue(store: &dyn KeyValueStore, queue_id: &str) -> Result<()> {
    store.set_add(keys::ACTIVE_QUEUES, queue_id).await?;

    if store.set_is_member(keys::REMOVED_QUEUES, queue_id).await? {
        warn!(queue_id = %queue_id, "Reactivating previously dropped queue");
        store.set_remove(keys::REMOVED_QUEUES, queue_id).await?;
    }

    info!(queue_id = %queue_id, "Queue added");
    Ok(())
}

/// Retire a queue. Its backlog stays visible via the removed set until drained.
pub async fn drop_queue(store: &dyn KeyValueStore, queue_id: &str) -> Result<()> {
    store.set_add(keys::REMOVED_QUEUES, queue_id).await?;
    store.set_remove(keys::ACTIVE_QUEUES, queue_id).await?;

    info!(queue_id = %queue_id, "Queue dropped");
    Ok(())
}

pub async fn is_active(store: &dyn KeyValueStore, queue_id: &str) -> Result<bool> {
    store.set_is_member(keys::ACTIVE_QUEUES, queue_id).await
}

/// Active queues, possibly empty
pub async fn active_members(store: &dyn KeyValueStore) -> Result<Vec<QueueId>> {
    store.set_members(keys::ACTIVE_QUEUES).await
}

/// Active queues for routing. Fails with `NoActiveQueues` when there are none.
pub async fn list_active(store: &dyn KeyValueStore) -> Result<Vec<QueueId>> {
    let queues = active_members(store).await?;
    if queues.is_empty() {
        return Err(AppError::NoActiveQueues);
    }
    Ok(queues)
}

/// Read phase: classify every removed queue by its current length
pub async fn scan_removed(store: &dyn KeyValueStore) -> Result<RemovedScan> {
    let mut scan = RemovedScan::default();

    for queue_id in store.set_members(keys::REMOVED_QUEUES).await? {
        match store.list_len(&queue_id).await? {
            0 => scan.drained.push(queue_id),
            len => scan.non_empty.push((queue_id, len)),
        }
    }

    Ok(scan)
}

/// Write phase: forget removed queues that were observed drained
///
/// # Returns
/// Number of queues removed from the removed set
pub async fn collect_garbage(store: &dyn KeyValueStore, drained: &[QueueId]) -> Result<usize> {
    for queue_id in drained {
        store.set_remove(keys::REMOVED_QUEUES, queue_id).await?;
        debug!(queue_id = %queue_id, "Drained queue garbage collected");
    }
    Ok(drained.len())
}

/// Removed queues that still hold items, with their lengths.
///
/// NOTE: this read garbage-collects drained members from the removed set.
pub async fn list_removed_non_empty(store: &dyn KeyValueStore) -> Result<Vec<(QueueId, u64)>> {
    let scan = scan_removed(store).await?;
    collect_garbage(store, &scan.drained).await?;
    Ok(scan.non_empty)
}
