// Application Layer - Use Cases and Business Logic

pub mod balancer;
pub mod completion;
pub mod consumer;
pub mod enqueue;
pub mod registry;
pub mod service;
pub mod status;

// Re-exports
pub use enqueue::EnqueueRequest;
pub use registry::RemovedScan;
pub use service::QueueService;
