// Queue Service - entry point bundling every use case behind injected ports

use crate::application::enqueue::{self, EnqueueRequest};
use crate::application::{completion, consumer, registry, status};
use crate::domain::{QueueId, StatusSnapshot};
use crate::error::Result;
use crate::port::{
    KeyValueStore, RandomSource, SystemTimeProvider, ThreadRandomSource, TimeProvider,
};
use std::sync::Arc;

/// Queue Service
///
/// Holds no state of its own; cloning shares the same ports.
#[derive(Clone)]
pub struct QueueService {
    store: Arc<dyn KeyValueStore>,
    random: Arc<dyn RandomSource>,
    clock: Arc<dyn TimeProvider>,
}

impl QueueService {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        random: Arc<dyn RandomSource>,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            store,
            random,
            clock,
        }
    }

    /// Service wired to the thread RNG and the system clock
    pub fn with_defaults(store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(store, Arc::new(ThreadRandomSource), Arc::new(SystemTimeProvider))
    }

    /// Route a new item to an active queue
    pub async fn enqueue(&self, req: EnqueueRequest) -> Result<QueueId> {
        enqueue::execute(
            self.store.as_ref(),
            self.random.as_ref(),
            self.clock.as_ref(),
            req,
        )
        .await
    }

    pub async fn add_queue(&self, queue_id: &str) -> Result<()> {
        registry::add_queue(self.store.as_ref(), queue_id).await
    }

    pub async fn drop_queue(&self, queue_id: &str) -> Result<()> {
        registry::drop_queue(self.store.as_ref(), queue_id).await
    }

    pub async fn is_active(&self, queue_id: &str) -> Result<bool> {
        registry::is_active(self.store.as_ref(), queue_id).await
    }

    /// Record a finished item (serialized JSON object)
    pub async fn complete(&self, item: &str) -> Result<()> {
        completion::execute(self.store.as_ref(), self.clock.as_ref(), item).await
    }

    /// Aggregate status; drains the timestamp samples it reports
    pub async fn status(&self) -> Result<StatusSnapshot> {
        status::execute(self.store.as_ref(), self.clock.as_ref()).await
    }

    pub async fn fractional_probability(&self) -> Result<f64> {
        status::fractional_probability(self.store.as_ref()).await
    }

    /// Admin-only: replace the fractional probability served to consumers
    pub async fn set_fractional_probability(&self, value: f64) -> Result<()> {
        status::set_fractional_probability(self.store.as_ref(), value).await
    }

    pub async fn pop(&self, queue_id: &str) -> Result<Option<String>> {
        consumer::pop_item(self.store.as_ref(), queue_id).await
    }

    pub async fn pop_completed(&self) -> Result<Option<String>> {
        consumer::pop_completed(self.store.as_ref()).await
    }
}
