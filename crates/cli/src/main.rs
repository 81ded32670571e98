//! balanceq CLI - operator commands, consumer, load generator and recorders

use anyhow::{Context, Result};
use balanceq_cli::{consume, load_gen, monitor};
use balanceq_core::port::{SystemTimeProvider, TimeProvider};
use balanceq_sdk::{BalanceqClient, EnqueueRequest, StatusSnapshot};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9527";

#[derive(Parser)]
#[command(name = "balanceq")]
#[command(about = "balanceq load-balanced queue CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "BALANCEQ_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Enqueue a single item
    Enqueue {
        /// Opaque payload
        #[arg(long)]
        payload: String,

        /// Caller-supplied query id
        #[arg(short, long)]
        query_id: i64,

        /// Producer send time in seconds (default: now)
        #[arg(long)]
        sent_time: Option<f64>,
    },

    /// Register a queue (reactivates a dropped one)
    AddQueue { queue_id: String },

    /// Retire a queue; its backlog stays visible until drained
    DropQueue { queue_id: String },

    /// Record a finished item (JSON object)
    Complete { item: String },

    /// Show a status snapshot (drains timestamp samples)
    Status {
        /// Print the raw snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Pop the oldest item of a queue
    Pop { queue_id: String },

    /// Set the probability with which consumers skip work
    SetFractional {
        /// Probability in [0, 1]
        value: f64,
    },

    /// Run a consumer on a fresh queue until Ctrl+C
    Consume {
        /// Simulated work per item
        #[arg(long, default_value = "20")]
        work_ms: u64,

        /// Pause when the queue is empty
        #[arg(long, default_value = "100")]
        idle_ms: u64,

        /// Honor the fractional probability, sleeping this long instead of working
        #[arg(long)]
        fractional_sleep_ms: Option<u64>,

        /// Use a fixed queue id instead of a random one
        #[arg(long)]
        queue_id: Option<String>,
    },

    /// Replay inter-arrival gaps as enqueues
    LoadGen {
        /// File with one gap in milliseconds per line
        #[arg(long, conflicts_with_all = ["interval_ms", "count"])]
        load: Option<PathBuf>,

        /// Constant gap in milliseconds
        #[arg(long, default_value = "10")]
        interval_ms: f64,

        /// Number of items with a constant gap
        #[arg(long, default_value = "1000")]
        count: usize,
    },

    /// Write one status snapshot per interval as JSON lines
    Monitor {
        #[arg(short, long, default_value = "metric.jsonl")]
        output: PathBuf,

        #[arg(long, default_value = "1000")]
        interval_ms: u64,

        /// Stop after this many snapshots
        #[arg(long)]
        count: Option<u64>,
    },

    /// Move completion records into a JSON-lines file
    Results {
        #[arg(short, long, default_value = "result.jsonl")]
        output: PathBuf,

        #[arg(long, default_value = "100")]
        idle_ms: u64,

        /// Stop once the completion list is empty
        #[arg(long)]
        exit_when_empty: bool,
    },
}

#[derive(Debug, PartialEq, Tabled)]
struct QueueRow {
    queue: String,
    state: String,
    size: u64,
}

fn queue_rows(snapshot: &StatusSnapshot) -> Vec<QueueRow> {
    let active = snapshot
        .active_queues
        .iter()
        .zip(&snapshot.active_queue_sizes)
        .map(|(queue, size)| QueueRow {
            queue: queue.clone(),
            state: "active".to_string(),
            size: *size,
        });
    let draining = snapshot
        .removed_queues
        .iter()
        .zip(&snapshot.removed_queue_sizes)
        .map(|(queue, size)| QueueRow {
            queue: queue.clone(),
            state: "draining".to_string(),
            size: *size,
        });
    active.chain(draining).collect()
}

fn print_status(rpc_url: &str, snapshot: &StatusSnapshot) {
    println!("{}", "System Status".cyan().bold());
    println!();
    println!("  {} {}", "RPC URL:".bold(), rpc_url);
    println!("  {} {}", "Active queues:".bold(), snapshot.active_count);
    println!("  {} {}", "Total items:".bold(), snapshot.total_items);
    println!("  {} {}", "Enqueues since last status:".bold(), snapshot.timestamps_ns.len());
    println!("  {} {}", "Fractional value:".bold(), snapshot.fractional_value);
    println!();

    let rows = queue_rows(snapshot);
    if rows.is_empty() {
        println!("  {}", "No queues registered".yellow());
    } else {
        println!("{}", Table::new(rows));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = BalanceqClient::connect(&cli.rpc_url)
        .await
        .context("Failed to create RPC client")?;

    match cli.command {
        Commands::Enqueue {
            payload,
            query_id,
            sent_time,
        } => {
            client
                .enqueue(EnqueueRequest {
                    payload,
                    producer_sent_time: sent_time.unwrap_or_else(|| SystemTimeProvider.now_secs()),
                    query_id,
                })
                .await?;
            println!("{}", format!("✓ Query {} enqueued", query_id).green().bold());
        }

        Commands::AddQueue { queue_id } => {
            client.add_queue(&queue_id).await?;
            println!("{}", format!("✓ Queue {} added", queue_id).green().bold());
        }

        Commands::DropQueue { queue_id } => {
            client.drop_queue(&queue_id).await?;
            println!("{}", format!("✓ Queue {} dropped", queue_id).green().bold());
        }

        Commands::Complete { item } => {
            client.complete(&item).await?;
            println!("{}", "✓ Completion recorded".green().bold());
        }

        Commands::Status { json } => {
            let snapshot = client.status().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print_status(&cli.rpc_url, &snapshot);
            }
        }

        Commands::Pop { queue_id } => match client.pop(&queue_id).await? {
            Some(item) => println!("{}", item),
            None => println!("{}", format!("Queue {} is empty", queue_id).yellow()),
        },

        Commands::SetFractional { value } => {
            client.set_fractional(value).await?;
            println!("{}", format!("✓ Fractional probability set to {}", value).green().bold());
        }

        Commands::Consume {
            work_ms,
            idle_ms,
            fractional_sleep_ms,
            queue_id,
        } => {
            let opts = consume::ConsumeOptions {
                work: Duration::from_millis(work_ms),
                idle: Duration::from_millis(idle_ms),
                fractional_sleep: fractional_sleep_ms.map(Duration::from_millis),
                queue_id,
            };
            consume::run(&client, opts).await?;
        }

        Commands::LoadGen {
            load,
            interval_ms,
            count,
        } => {
            let deltas = match load {
                Some(path) => load_gen::load_deltas(&path).await?,
                None => vec![interval_ms; count],
            };
            load_gen::run(&client, &deltas).await?;
        }

        Commands::Monitor {
            output,
            interval_ms,
            count,
        } => {
            monitor::record_status(
                &client,
                &output,
                Duration::from_millis(interval_ms),
                count,
                consume::shutdown_signal(),
            )
            .await?;
        }

        Commands::Results {
            output,
            idle_ms,
            exit_when_empty,
        } => {
            monitor::record_results(
                &client,
                &output,
                Duration::from_millis(idle_ms),
                exit_when_empty,
                consume::shutdown_signal(),
            )
            .await?;
        }
    }

    Ok(())
}
