// Queue Item Domain Model

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Wire name of the completion timestamp
pub const COMPLETION_TIME_FIELD: &str = "_4_done_time";

/// Wire name of the dequeue timestamp (stamped by consumers)
pub const DEQUEUE_TIME_FIELD: &str = "_3_dequeue_time";

/// A work item as stored in a queue's backing list.
///
/// Timestamps are fractional seconds since the Unix epoch. The numbered field
/// names keep records sortable by lifecycle stage when dumped as JSON lines.
/// Unknown fields attached by consumers survive a parse/serialize cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    /// Opaque payload; consumers usually strip it before completing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,

    pub query_id: i64,

    /// Producer-reported send time
    #[serde(rename = "_1_lg_sent")]
    pub sent_time: f64,

    /// Server-assigned enqueue time
    #[serde(rename = "_2_enqueue_time")]
    pub enqueue_time: f64,

    #[serde(
        rename = "_3_dequeue_time",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub dequeue_time: Option<f64>,

    #[serde(
        rename = "_4_done_time",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub completion_time: Option<f64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QueueItem {
    /// Create a freshly enqueued item
    pub fn new(
        payload: impl Into<String>,
        query_id: i64,
        sent_time: f64,
        enqueue_time: f64,
    ) -> Self {
        Self {
            payload: Some(payload.into()),
            query_id,
            sent_time,
            enqueue_time,
            dequeue_time: None,
            completion_time: None,
            extra: Map::new(),
        }
    }

    /// Parse a stored item
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| AppError::MalformedItem(e.to_string()))
    }

    /// Serialize for storage
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| AppError::Internal(e.to_string()))
    }

    /// Consumer-side step: stamp dequeue time and hand out the payload
    pub fn begin_processing(&mut self, now_secs: f64) -> Option<String> {
        self.dequeue_time = Some(now_secs);
        self.payload.take()
    }

    /// Enqueue-to-completion latency, once both stamps exist
    pub fn latency_secs(&self) -> Option<f64> {
        self.completion_time.map(|done| done - self.enqueue_time)
    }
}
