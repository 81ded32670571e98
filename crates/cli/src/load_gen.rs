//! Load generator
//!
//! Replays a trace of inter-arrival gaps against the daemon.

use anyhow::{Context, Result};
use balanceq_core::port::{SystemTimeProvider, TimeProvider};
use balanceq_sdk::{BalanceqClient, EnqueueRequest};
use colored::Colorize;
use std::path::Path;
use std::time::Duration;

/// Fixed payload carried by every generated item
pub const PAYLOAD_SIZE: usize = 100;
const LOG_EVERY: usize = 1000;

/// Parse inter-arrival gaps in milliseconds, one per line.
/// Blank lines and `#` comments are ignored.
pub fn parse_deltas(contents: &str) -> Result<Vec<f64>> {
    contents
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(lineno, line)| {
            let delta: f64 = line
                .parse()
                .with_context(|| format!("line {}: {:?} is not a number", lineno, line))?;
            if !delta.is_finite() || delta < 0.0 {
                anyhow::bail!("line {}: delta must be a non-negative number", lineno);
            }
            Ok(delta)
        })
        .collect()
}

pub async fn load_deltas(path: &Path) -> Result<Vec<f64>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read load trace {}", path.display()))?;
    parse_deltas(&contents)
}

/// Block until at least one consumer registered a queue
pub async fn wait_for_consumers(client: &BalanceqClient) -> Result<()> {
    loop {
        if client.status().await?.active_count > 0 {
            return Ok(());
        }
        println!("{}", "Zero worker available, waiting...".yellow());
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}

/// Enqueue one item per delta, sleeping the delta after each
pub async fn run(client: &BalanceqClient, deltas: &[f64]) -> Result<()> {
    wait_for_consumers(client).await?;

    let payload = "1".repeat(PAYLOAD_SIZE);
    for (idx, delta) in deltas.iter().enumerate() {
        client
            .enqueue(EnqueueRequest {
                payload: payload.clone(),
                producer_sent_time: SystemTimeProvider.now_secs(),
                query_id: idx as i64,
            })
            .await?;

        if (idx + 1) % LOG_EVERY == 0 {
            println!("Enqueued {}/{} items...", idx + 1, deltas.len());
        }

        tokio::time::sleep(Duration::from_secs_f64(delta / 1000.0)).await;
    }

    println!("{}", "✓ Load generation finished!".green().bold());
    Ok(())
}
