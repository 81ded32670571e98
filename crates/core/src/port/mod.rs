// Port Layer - Interfaces for external dependencies

pub mod memory_store;
pub mod random_source; // For deterministic testing
pub mod storage;
pub mod time_provider;

// Re-exports
pub use memory_store::InMemoryStore;
pub use random_source::{RandomSource, ThreadRandomSource};
pub use storage::KeyValueStore;
pub use time_provider::{SystemTimeProvider, TimeProvider};
