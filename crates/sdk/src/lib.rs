//! balanceq SDK - Rust Client Library
//!
//! Provides a typed client for the balanceq daemon.
//!
//! # Example
//!
//! ```no_run
//! use balanceq_sdk::{BalanceqClient, EnqueueRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BalanceqClient::connect("http://127.0.0.1:9527").await?;
//!
//!     // A consumer registers its queue, producers enqueue
//!     client.add_queue("worker-1").await?;
//!     client.enqueue(EnqueueRequest {
//!         payload: "hello".to_string(),
//!         producer_sent_time: 1_700_000_000.0,
//!         query_id: 1,
//!     }).await?;
//!
//!     if let Some(item) = client.pop_item("worker-1").await? {
//!         client.complete_item(&item).await?;
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::BalanceqClient;
pub use error::{code, Result, SdkError};
pub use types::{EnqueueRequest, QueueItem, StatusSnapshot};
