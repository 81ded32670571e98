// Load Balancer - power-of-two-choices routing
//
// Sampling two queues and taking the shorter bounds the maximum backlog to
// O(log log n) with two length queries per enqueue instead of n.

use crate::domain::QueueId;
use crate::error::{AppError, Result};
use crate::port::{KeyValueStore, RandomSource};
use tracing::debug;

/// Pick the destination queue for a new item.
///
/// * one active queue: returned without touching storage
/// * otherwise: two distinct queues sampled uniformly, the strictly shorter
///   one wins, ties keep the first sampled
///
/// Lengths are independent reads and may be stale by the time the item is
/// appended.
pub async fn choose_queue(
    store: &dyn KeyValueStore,
    random: &dyn RandomSource,
    active: &[QueueId],
) -> Result<QueueId> {
    match active {
        [] => Err(AppError::NoActiveQueues),
        [only] => Ok(only.clone()),
        _ => {
            let (i, j) = random.pick_two(active.len());
            let (first, second) = match (active.get(i), active.get(j)) {
                (Some(first), Some(second)) if i != j => (first, second),
                _ => {
                    return Err(AppError::Internal(format!(
                        "random source picked invalid pair ({}, {}) for {} queues",
                        i,
                        j,
                        active.len()
                    )))
                }
            };

            let first_len = store.list_len(first).await?;
            let second_len = store.list_len(second).await?;

            let chosen = if second_len < first_len {
                second
            } else {
                first
            };

            debug!(
                first = %first,
                first_len,
                second = %second,
                second_len,
                chosen = %chosen,
                "Queue chosen"
            );

            Ok(chosen.clone())
        }
    }
}
