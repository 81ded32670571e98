// Status Snapshot Domain Model

use super::queue::QueueId;
use serde::{Deserialize, Serialize};

/// Aggregate view produced by the status reporter.
///
/// Queue ids and sizes are parallel vectors. Serialized names match what
/// controllers and monitors already consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Enqueue timestamps (ns) drained by this snapshot
    #[serde(rename = "real_ts_ns")]
    pub timestamps_ns: Vec<i64>,

    #[serde(rename = "queues")]
    pub active_queues: Vec<QueueId>,

    #[serde(rename = "queue_sizes")]
    pub active_queue_sizes: Vec<u64>,

    /// Dropped queues still holding items
    #[serde(rename = "dropped_queues")]
    pub removed_queues: Vec<QueueId>,

    #[serde(rename = "dropped_queue_sizes")]
    pub removed_queue_sizes: Vec<u64>,

    #[serde(rename = "total_queue_size")]
    pub total_items: u64,

    #[serde(rename = "num_active_replica")]
    pub active_count: usize,

    pub current_time_ns: i64,

    pub fractional_value: f64,
}

impl StatusSnapshot {
    /// Length of an active queue as observed by this snapshot
    pub fn active_length(&self, queue_id: &str) -> Option<u64> {
        lookup(&self.active_queues, &self.active_queue_sizes, queue_id)
    }

    /// Length of a removed queue as observed by this snapshot
    pub fn removed_length(&self, queue_id: &str) -> Option<u64> {
        lookup(&self.removed_queues, &self.removed_queue_sizes, queue_id)
    }
}

fn lookup(ids: &[QueueId], sizes: &[u64], queue_id: &str) -> Option<u64> {
    ids.iter()
        .position(|id| id == queue_id)
        .and_then(|idx| sizes.get(idx).copied())
}
