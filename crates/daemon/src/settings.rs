//! Daemon settings
//!
//! Sources, later ones override earlier ones:
//!  1. `config/balanceq.{toml,yaml,json}` (optional)
//!  2. the file named by `BALANCEQ_CONFIG_FILE` (required when set)
//!  3. environment variables `BALANCEQ__SECTION__KEY`,
//!     e.g. `BALANCEQ__RPC__PORT=9600`
//!
//! Every field has a default, so an unconfigured environment is valid.

use balanceq_core::error::{AppError, Result};
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use serde::Deserialize;

pub const CONFIG_FILE_ENV: &str = "BALANCEQ_CONFIG_FILE";
const ENV_PREFIX: &str = "BALANCEQ";
const DEFAULT_CONFIG_FILE: &str = "config/balanceq";
const DEFAULT_DATABASE_URL: &str = "~/.balanceq/store.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub database_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            database_url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcConfig {
    fn default() -> Self {
        let defaults = balanceq_api_rpc::RpcServerConfig::default();
        Self {
            host: defaults.host,
            port: defaults.port,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub storage: StorageConfig,
    pub rpc: RpcConfig,
    pub log: LogConfig,
}

impl DaemonConfig {
    /// Load from the default file, the operator file and the environment
    pub fn load() -> Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false));

        if let Ok(explicit_path) = std::env::var(CONFIG_FILE_ENV) {
            if !explicit_path.is_empty() {
                builder = builder.add_source(File::with_name(&explicit_path).required(true));
            }
        }

        Self::from_builder(
            builder.add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            ),
        )
    }

    /// Build, deserialize and validate
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let mut cfg: DaemonConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| AppError::Config(e.to_string()))?;

        cfg.storage.database_url = shellexpand::tilde(&cfg.storage.database_url).into_owned();
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.rpc.host.trim().is_empty() {
            return Err(AppError::Config("rpc.host must not be empty".to_string()));
        }
        if self.storage.backend == StorageBackend::Sqlite
            && self.storage.database_url.trim().is_empty()
        {
            return Err(AppError::Config(
                "storage.database_url is required for the sqlite backend".to_string(),
            ));
        }
        Ok(())
    }
}
