//! balanceq daemon - Main Entry Point
//!
//! Composition root: loads configuration, wires the storage adapter into the
//! queue service and serves it over JSON-RPC until Ctrl+C.

mod settings;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use balanceq_api_rpc::{RpcServer, RpcServerConfig};
use balanceq_core::application::QueueService;
use balanceq_core::port::{InMemoryStore, KeyValueStore};
use balanceq_infra_sqlite::{create_pool, is_in_memory, run_migrations, SqliteStore};
use settings::{DaemonConfig, LogFormat, StorageBackend};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration (before logging so the format can be chosen)
    let cfg = DaemonConfig::load()?;

    // 2. Initialize logging
    init_logging(cfg.log.format)?;

    info!("balanceq daemon v{} starting...", VERSION);

    // 3. Initialize storage
    let store = open_store(&cfg).await?;

    // 4. Setup dependencies (DI wiring)
    let service = QueueService::with_defaults(store);

    // 5. Start JSON-RPC server
    let rpc_config = RpcServerConfig {
        host: cfg.rpc.host.clone(),
        port: cfg.rpc.port,
    };
    let (addr, rpc_handle) = RpcServer::new(rpc_config, service)
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!(addr = %addr, "System ready. Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;

    info!("Shutdown complete.");

    Ok(())
}

fn init_logging(format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("balanceq=info"))?;

    match format {
        LogFormat::Json => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Pretty => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

async fn open_store(cfg: &DaemonConfig) -> Result<Arc<dyn KeyValueStore>> {
    match cfg.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage (state is lost on exit)");
            Ok(Arc::new(InMemoryStore::new()))
        }
        StorageBackend::Sqlite => {
            let database_url = cfg.storage.database_url.as_str();
            info!(database_url = %database_url, "Initializing database...");

            if !is_in_memory(database_url) {
                let path = database_url
                    .trim_start_matches("sqlite://")
                    .trim_start_matches("sqlite:");
                if let Some(parent) = Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
            }

            let pool = create_pool(database_url)
                .await
                .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
            run_migrations(&pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

            Ok(Arc::new(SqliteStore::new(pool)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use settings::StorageConfig;
    use tokio_test::assert_ok;

    fn config(backend: StorageBackend, database_url: &str) -> DaemonConfig {
        DaemonConfig {
            storage: StorageConfig {
                backend,
                database_url: database_url.to_string(),
            },
            ..DaemonConfig::default()
        }
    }

    #[tokio::test]
    async fn test_open_memory_store() {
        let store = assert_ok!(open_store(&config(StorageBackend::Memory, "")).await);
        assert_ok!(store.set_add("active_queues", "a").await);
        assert!(assert_ok!(store.set_is_member("active_queues", "a").await));
    }

    #[tokio::test]
    async fn test_open_sqlite_store_runs_migrations() {
        let cfg = config(StorageBackend::Sqlite, "sqlite::memory:");
        let store = assert_ok!(open_store(&cfg).await);
        assert_ok!(store.list_push_back("q", "item").await);
        assert_eq!(assert_ok!(store.list_len("q").await), 1);
    }
}
