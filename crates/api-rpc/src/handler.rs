//! RPC Method Handlers
//!
//! Thin adapters from JSON-RPC parameters to the queue service.

use crate::error::to_rpc_error;
use crate::types::{CompleteRequest, EnqueueRequest, FractionalRequest, QueueRequest};
use balanceq_core::application::QueueService;
use balanceq_core::domain::StatusSnapshot;
use jsonrpsee::types::ErrorObjectOwned;
use tracing::debug;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    service: QueueService,
}

impl RpcHandler {
    pub fn new(service: QueueService) -> Self {
        Self { service }
    }

    /// queue.enqueue.v1 (replies null; the chosen queue stays server-side)
    pub async fn enqueue(&self, params: EnqueueRequest) -> Result<(), ErrorObjectOwned> {
        let queue_id = self
            .service
            .enqueue(params.into())
            .await
            .map_err(to_rpc_error)?;

        debug!(queue_id = %queue_id, "enqueue handled");
        Ok(())
    }

    /// queue.add.v1
    pub async fn add_queue(&self, params: QueueRequest) -> Result<(), ErrorObjectOwned> {
        self.service
            .add_queue(&params.queue_id)
            .await
            .map_err(to_rpc_error)
    }

    /// queue.drop.v1
    pub async fn drop_queue(&self, params: QueueRequest) -> Result<(), ErrorObjectOwned> {
        self.service
            .drop_queue(&params.queue_id)
            .await
            .map_err(to_rpc_error)
    }

    /// queue.complete.v1
    pub async fn complete(&self, params: CompleteRequest) -> Result<(), ErrorObjectOwned> {
        self.service
            .complete(&params.item)
            .await
            .map_err(to_rpc_error)
    }

    /// admin.status.v1
    pub async fn status(&self) -> Result<StatusSnapshot, ErrorObjectOwned> {
        self.service.status().await.map_err(to_rpc_error)
    }

    /// queue.pop.v1
    pub async fn pop(&self, params: QueueRequest) -> Result<Option<String>, ErrorObjectOwned> {
        self.service
            .pop(&params.queue_id)
            .await
            .map_err(to_rpc_error)
    }

    /// results.pop.v1
    pub async fn pop_completed(&self) -> Result<Option<String>, ErrorObjectOwned> {
        self.service.pop_completed().await.map_err(to_rpc_error)
    }

    /// admin.fractional.v1
    pub async fn fractional(&self) -> Result<f64, ErrorObjectOwned> {
        self.service
            .fractional_probability()
            .await
            .map_err(to_rpc_error)
    }

    /// admin.set_fractional.v1
    pub async fn set_fractional(&self, params: FractionalRequest) -> Result<(), ErrorObjectOwned> {
        self.service
            .set_fractional_probability(params.value)
            .await
            .map_err(to_rpc_error)
    }

    /// queue.is_active.v1
    pub async fn is_active(&self, params: QueueRequest) -> Result<bool, ErrorObjectOwned> {
        self.service
            .is_active(&params.queue_id)
            .await
            .map_err(to_rpc_error)
    }
}
