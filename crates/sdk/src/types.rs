//! SDK Request Types
//!
//! Mirrors the JSON-RPC parameter types from the api-rpc crate. Results use
//! the core domain types directly.

use serde::Serialize;

pub use balanceq_core::domain::{QueueItem, StatusSnapshot};

/// Parameters of `queue.enqueue.v1`
#[derive(Debug, Clone, Serialize)]
pub struct EnqueueRequest {
    pub payload: String,
    /// Seconds since epoch, as measured by the producer
    pub producer_sent_time: f64,
    pub query_id: i64,
}

/// Parameters of every method addressing a single queue
#[derive(Debug, Clone, Serialize)]
pub(crate) struct QueueRequest<'a> {
    pub queue_id: &'a str,
}

/// Parameters of `admin.set_fractional.v1`
#[derive(Debug, Clone, Serialize)]
pub(crate) struct FractionalRequest {
    pub value: f64,
}

/// Parameters of `queue.complete.v1`
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CompleteRequest<'a> {
    pub item: &'a str,
}
