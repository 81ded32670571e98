//! balanceq Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{
    CompleteRequest, EnqueueRequest, FractionalRequest, QueueItem, QueueRequest, StatusSnapshot,
};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ObjectParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// balanceq Client
///
/// Provides a typed interface to the balanceq daemon.
///
/// # Example
///
/// ```no_run
/// use balanceq_sdk::BalanceqClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = BalanceqClient::connect("http://127.0.0.1:9527").await?;
/// client.add_queue("worker-1").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BalanceqClient {
    client: HttpClient,
}

impl BalanceqClient {
    /// Connect to the balanceq daemon
    ///
    /// # Arguments
    ///
    /// * `url` - RPC endpoint URL (e.g., `http://127.0.0.1:9527`)
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref();

        let client = HttpClientBuilder::default()
            .request_timeout(Duration::from_secs(30))
            .build(url)
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self { client })
    }

    /// Route an item to one of the active queues
    ///
    /// Fails with `SdkError::NoActiveQueues` until a consumer registered a queue.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use balanceq_sdk::{BalanceqClient, EnqueueRequest};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = BalanceqClient::connect("http://127.0.0.1:9527").await?;
    /// client.enqueue(EnqueueRequest {
    ///     payload: "a".repeat(100),
    ///     producer_sent_time: 1_700_000_000.0,
    ///     query_id: 1,
    /// }).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn enqueue(&self, request: EnqueueRequest) -> Result<()> {
        self.call_unit("queue.enqueue.v1", &request).await
    }

    pub async fn add_queue(&self, queue_id: &str) -> Result<()> {
        self.call_unit("queue.add.v1", &QueueRequest { queue_id }).await
    }

    pub async fn drop_queue(&self, queue_id: &str) -> Result<()> {
        self.call_unit("queue.drop.v1", &QueueRequest { queue_id }).await
    }

    pub async fn is_active(&self, queue_id: &str) -> Result<bool> {
        self.call("queue.is_active.v1", &QueueRequest { queue_id }).await
    }

    /// Record a finished item (serialized JSON object)
    pub async fn complete(&self, item: &str) -> Result<()> {
        self.call_unit("queue.complete.v1", &CompleteRequest { item }).await
    }

    /// Record a finished item
    pub async fn complete_item(&self, item: &QueueItem) -> Result<()> {
        self.complete(&serde_json::to_string(item)?).await
    }

    /// Status snapshot. Drains the server's timestamp samples.
    pub async fn status(&self) -> Result<StatusSnapshot> {
        self.call("admin.status.v1", &serde_json::Map::new()).await
    }

    pub async fn fractional(&self) -> Result<f64> {
        self.call("admin.fractional.v1", &serde_json::Map::new()).await
    }

    /// Replace the fractional probability consumers honour (admin)
    ///
    /// Values outside `[0, 1]` fail with `SdkError::InvalidArgument`.
    pub async fn set_fractional(&self, value: f64) -> Result<()> {
        self.call_unit("admin.set_fractional.v1", &FractionalRequest { value }).await
    }

    /// Pop the oldest raw item of a queue
    pub async fn pop(&self, queue_id: &str) -> Result<Option<String>> {
        self.call("queue.pop.v1", &QueueRequest { queue_id }).await
    }

    /// Pop and parse the oldest item of a queue
    pub async fn pop_item(&self, queue_id: &str) -> Result<Option<QueueItem>> {
        match self.pop(queue_id).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Pop the newest completion record
    pub async fn pop_completed(&self) -> Result<Option<String>> {
        self.call("results.pop.v1", &serde_json::Map::new()).await
    }

    async fn call<P, R>(&self, method: &str, params: &P) -> Result<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let response: R = self.client.request(method, object_params(params)?).await?;
        Ok(response)
    }

    /// Methods replying `null`
    async fn call_unit<P: Serialize>(&self, method: &str, params: &P) -> Result<()> {
        let _: serde_json::Value = self.call(method, params).await?;
        Ok(())
    }
}

/// Named parameters built from a struct's fields
fn object_params<P: Serialize>(params: &P) -> Result<ObjectParams> {
    let mut object = ObjectParams::new();
    match serde_json::to_value(params)? {
        serde_json::Value::Object(fields) => {
            for (name, value) in fields {
                object.insert(&name, value)?;
            }
            Ok(object)
        }
        other => Err(SdkError::Other(format!(
            "RPC parameters must serialize to an object, got {}",
            other
        ))),
    }
}
