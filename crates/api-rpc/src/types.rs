//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters. Results reuse the core domain
//! types (`StatusSnapshot`) or plain JSON values.

use serde::{Deserialize, Serialize};

/// queue.enqueue.v1 - Route an item to an active queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnqueueRequest {
    pub payload: String,
    pub producer_sent_time: f64,
    pub query_id: i64,
}

/// queue.add.v1, queue.drop.v1, queue.pop.v1, queue.is_active.v1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueRequest {
    pub queue_id: String,
}

/// queue.complete.v1 - Record a finished item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteRequest {
    /// Serialized item (JSON object text)
    pub item: String,
}

/// admin.set_fractional.v1 - Replace the fractional probability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FractionalRequest {
    /// Probability in [0, 1]
    pub value: f64,
}

impl From<EnqueueRequest> for balanceq_core::application::EnqueueRequest {
    fn from(req: EnqueueRequest) -> Self {
        Self {
            payload: req.payload,
            producer_sent_time: req.producer_sent_time,
            query_id: req.query_id,
        }
    }
}
