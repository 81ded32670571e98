//! JSON-lines recorders for status snapshots and completion records

use anyhow::{Context, Result};
use balanceq_sdk::BalanceqClient;
use colored::Colorize;
use std::path::Path;
use std::time::Duration;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::watch;

const LOG_EVERY: u64 = 1000;

async fn open_output(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))
}

async fn write_line(file: &mut File, line: &str) -> Result<()> {
    file.write_all(line.as_bytes()).await?;
    file.write_all(b"\n").await?;
    file.flush().await?;
    Ok(())
}

/// Append one status snapshot per `interval` until shutdown or `limit`
/// snapshots have been written.
pub async fn record_status(
    client: &BalanceqClient,
    path: &Path,
    interval: Duration,
    limit: Option<u64>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<u64> {
    let mut file = open_output(path).await?;
    let mut written = 0u64;

    while !*shutdown.borrow() && limit.map_or(true, |max| written < max) {
        let snapshot = client.status().await?;
        write_line(&mut file, &serde_json::to_string(&snapshot)?).await?;
        written += 1;
        if written % LOG_EVERY == 0 {
            println!("Writing metric... ({} snapshots)", written);
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = shutdown.changed() => {}
        }
    }

    println!("{} {} snapshots written to {}", "✓".green(), written, path.display());
    Ok(written)
}

/// Move completion records into a JSON-lines file until shutdown.
///
/// With `exit_when_empty` the writer stops at the first empty poll.
pub async fn record_results(
    client: &BalanceqClient,
    path: &Path,
    idle: Duration,
    exit_when_empty: bool,
    mut shutdown: watch::Receiver<bool>,
) -> Result<u64> {
    let mut file = open_output(path).await?;
    let mut written = 0u64;

    while !*shutdown.borrow() {
        match client.pop_completed().await? {
            Some(record) => {
                write_line(&mut file, &record).await?;
                written += 1;
                if written % LOG_EVERY == 0 {
                    println!("Writing result... ({} records)", written);
                }
            }
            None if exit_when_empty => break,
            None => {
                tokio::select! {
                    _ = tokio::time::sleep(idle) => {}
                    _ = shutdown.changed() => {}
                }
            }
        }
    }

    println!("{} {} records written to {}", "✓".green(), written, path.display());
    Ok(written)
}
