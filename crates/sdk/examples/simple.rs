//! Simple SDK Example
//!
//! Registers a queue, enqueues a few items, consumes them and prints the
//! resulting status snapshot.
//!
//! # Usage
//!
//! 1. Start the daemon:
//!    ```bash
//!    cargo run --package balanceq-daemon
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    cargo run --package balanceq-sdk --example simple
//!    ```

use anyhow::Result;
use balanceq_sdk::{BalanceqClient, EnqueueRequest};
use std::time::{SystemTime, UNIX_EPOCH};

const QUEUE_ID: &str = "simple-example";

#[tokio::main]
async fn main() -> Result<()> {
    println!("balanceq SDK - Simple Example");
    println!("=============================\n");

    // 1. Connect to daemon
    println!("1. Connecting to daemon...");
    let client = BalanceqClient::connect("http://127.0.0.1:9527").await?;
    println!("   ✓ Connected\n");

    // 2. Register a queue
    println!("2. Registering queue {}...", QUEUE_ID);
    client.add_queue(QUEUE_ID).await?;
    println!("   ✓ Active: {}\n", client.is_active(QUEUE_ID).await?);

    // 3. Enqueue items
    println!("3. Enqueuing 3 items...");
    for query_id in 0..3 {
        let sent = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs_f64();
        client
            .enqueue(EnqueueRequest {
                payload: format!("item-{}", query_id),
                producer_sent_time: sent,
                query_id,
            })
            .await?;
    }
    println!("   ✓ Done\n");

    // 4. Consume and complete them
    println!("4. Consuming...");
    while let Some(mut item) = client.pop_item(QUEUE_ID).await? {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs_f64();
        let payload = item.begin_processing(now);
        println!("   - query {} payload {:?}", item.query_id, payload);
        client.complete_item(&item).await?;
    }
    println!();

    // 5. Status
    let status = client.status().await?;
    println!("5. Status:");
    println!("   - active queues: {:?}", status.active_queues);
    println!("   - total items:   {}", status.total_items);
    println!("   - samples:       {}", status.timestamps_ns.len());

    // 6. Cleanup
    client.drop_queue(QUEUE_ID).await?;

    println!("\n✓ Example completed successfully!");

    Ok(())
}
