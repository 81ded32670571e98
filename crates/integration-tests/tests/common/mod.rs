//! Shared fixture: a JSON-RPC server over in-memory SQLite on an ephemeral port

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use balanceq_api_rpc::{RpcServer, RpcServerConfig};
use balanceq_core::application::QueueService;
use balanceq_infra_sqlite::{create_pool, run_migrations, SqliteStore};
use balanceq_sdk::{BalanceqClient, EnqueueRequest};
use jsonrpsee::server::ServerHandle;

pub struct TestDaemon {
    pub client: BalanceqClient,
    pub store: Arc<SqliteStore>,
    handle: ServerHandle,
}

impl TestDaemon {
    pub async fn start() -> Self {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        let store = Arc::new(SqliteStore::new(pool));

        let config = RpcServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        };
        let server = RpcServer::new(config, QueueService::with_defaults(store.clone()));
        let (addr, handle) = server.start().await.unwrap();

        let client = BalanceqClient::connect(format!("http://{}", addr))
            .await
            .unwrap();

        Self {
            client,
            store,
            handle,
        }
    }

    pub async fn stop(self) {
        self.handle.stop().unwrap();
        self.handle.stopped().await;
    }
}

pub fn request(query_id: i64) -> EnqueueRequest {
    EnqueueRequest {
        payload: "1".repeat(100),
        producer_sent_time: 1_700_000_000.0,
        query_id,
    }
}

/// Unique path under the system temp dir
pub fn temp_path(prefix: &str, extension: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "{}-{}.{}",
        prefix,
        uuid::Uuid::new_v4().simple(),
        extension
    ))
}
