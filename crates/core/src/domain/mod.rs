// Domain Layer - Pure data model shared by every use case

pub mod item;
pub mod queue;
pub mod status;

// Re-exports
pub use item::{QueueItem, COMPLETION_TIME_FIELD, DEQUEUE_TIME_FIELD};
pub use queue::{keys, QueueId};
pub use status::StatusSnapshot;
