//! Consumer loop
//!
//! Registers a fresh queue, processes its items until Ctrl+C, then drops the
//! queue and finishes whatever is left in it.

use anyhow::Result;
use balanceq_core::port::{SystemTimeProvider, TimeProvider};
use balanceq_sdk::{BalanceqClient, QueueItem};
use colored::Colorize;
use std::time::Duration;
use tokio::sync::watch;

const LOG_EVERY: u64 = 50;

#[derive(Debug, Clone)]
pub struct ConsumeOptions {
    /// Simulated processing time per item
    pub work: Duration,
    /// Pause when the queue is empty
    pub idle: Duration,
    /// When set, skip work with the server's fractional probability and
    /// sleep this long instead
    pub fractional_sleep: Option<Duration>,
    /// Fixed queue id (a fresh uuid otherwise)
    pub queue_id: Option<String>,
}

/// Items handled by one consumer run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumeReport {
    pub processed: u64,
    /// Items finished after the queue was dropped
    pub drained: u64,
}

pub async fn run(client: &BalanceqClient, opts: ConsumeOptions) -> Result<()> {
    let report = run_until(client, opts, shutdown_signal()).await?;

    println!(
        "{} processed {} items, drained {} on shutdown",
        "✓ All done:".green().bold(),
        report.processed,
        report.drained
    );
    Ok(())
}

/// Register the queue, consume until `shutdown` flips, then drop the queue
/// and finish its backlog.
///
/// The queue is dropped even when the loop fails, so a dead consumer stops
/// receiving routed items.
pub async fn run_until(
    client: &BalanceqClient,
    opts: ConsumeOptions,
    shutdown: watch::Receiver<bool>,
) -> Result<ConsumeReport> {
    let queue_id = opts
        .queue_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());

    client.add_queue(&queue_id).await?;
    println!("{} {}", "✓ Consuming from queue".green().bold(), queue_id);

    let outcome = consume_until(client, &queue_id, &opts, shutdown).await;

    let dropped = client.drop_queue(&queue_id).await;
    let processed = outcome?;
    dropped?;

    println!("Shutdown requested. Draining the queue...");
    let drained = drain(client, &queue_id, opts.work).await?;

    Ok(ConsumeReport { processed, drained })
}

/// Flips to true on Ctrl+C (or if the handler cannot be installed)
pub fn shutdown_signal() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        let _ = tx.send(true);
    });
    rx
}

/// Main loop. An item already popped is always completed before the
/// shutdown flag is checked again.
pub async fn consume_until(
    client: &BalanceqClient,
    queue_id: &str,
    opts: &ConsumeOptions,
    mut shutdown: watch::Receiver<bool>,
) -> Result<u64> {
    let mut processed = 0u64;

    while !*shutdown.borrow() {
        if let Some(sleep) = opts.fractional_sleep {
            let fractional = client.fractional().await?;
            if rand::random::<f64>() < fractional {
                pause(&mut shutdown, sleep).await;
                continue;
            }
        }

        match client.pop_item(queue_id).await? {
            Some(item) => {
                process(client, item, opts.work).await?;
                processed += 1;
                if processed % LOG_EVERY == 0 {
                    println!("Processed {} items...", processed);
                }
            }
            None => pause(&mut shutdown, opts.idle).await,
        }
    }

    Ok(processed)
}

/// Finish every item still in a (dropped) queue
pub async fn drain(client: &BalanceqClient, queue_id: &str, work: Duration) -> Result<u64> {
    let mut drained = 0u64;
    while let Some(item) = client.pop_item(queue_id).await? {
        process(client, item, work).await?;
        drained += 1;
    }
    Ok(drained)
}

/// Stamp dequeue time, strip the payload, work, then report completion
async fn process(client: &BalanceqClient, mut item: QueueItem, work: Duration) -> Result<()> {
    let _payload = item.begin_processing(SystemTimeProvider.now_secs());
    if !work.is_zero() {
        tokio::time::sleep(work).await;
    }
    client.complete_item(&item).await?;
    Ok(())
}

async fn pause(shutdown: &mut watch::Receiver<bool>, duration: Duration) {
    tokio::select! {
        _ = tokio::time::sleep(duration) => {}
        _ = shutdown.changed() => {}
    }
}
