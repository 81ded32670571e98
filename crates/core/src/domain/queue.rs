// Queue Domain Model

/// Queue identifier, supplied by the caller and never interpreted.
/// Doubles as the storage key of the queue's backing list.
pub type QueueId = String;

/// Fixed storage keys (No magic values)
pub mod keys {
    /// Set of queues eligible for new items
    pub const ACTIVE_QUEUES: &str = "active_queues";

    /// Set of dropped queues that may still hold items
    pub const REMOVED_QUEUES: &str = "removed_queues";

    /// List of enqueue timestamps (ns), drained by every status snapshot
    pub const MONITOR_TIMESTAMPS: &str = "real_timestamp";

    /// Externally configured scalar reported by status
    pub const FRACTIONAL_PROBABILITY: &str = "fractional_prob";

    /// List of completed items, newest first
    pub const COMPLETION_QUEUE: &str = "completion_queue";
}
