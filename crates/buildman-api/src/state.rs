//! Application state wiring the build manager to its adapters.
//!
//! `BuildManager` is generic over the store and the game client; AppState
//! pins it to the SQLite store and the reqwest game client.

use std::path::PathBuf;
use std::sync::Arc;

use secrecy::SecretString;

use buildman_core::service::BuildManager;
use buildman_infra::config::load_global_config;
use buildman_infra::filesystem::{ensure_data_dir, resolve_data_dir};
use buildman_infra::http::client::HttpGameClient;
use buildman_infra::sqlite::kv::SqliteKvStore;
use buildman_infra::sqlite::pool::{DatabasePool, database_url};
use buildman_types::config::GlobalConfig;

pub type ConcreteBuildManager = BuildManager<SqliteKvStore, HttpGameClient>;

/// Shared application state. Used by both CLI commands and REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<ConcreteBuildManager>,
    pub config: Arc<GlobalConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Resolve the data directory, read `config.toml` and open the store.
    pub async fn init(session: Option<SecretString>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        ensure_data_dir(&data_dir).await?;
        let config = load_global_config(&data_dir).await;
        Self::open(data_dir, config, session).await
    }

    /// Open the store inside `data_dir` and restore the manager from it.
    pub async fn open(
        data_dir: PathBuf,
        config: GlobalConfig,
        session: Option<SecretString>,
    ) -> anyhow::Result<Self> {
        let pool = DatabasePool::new(&database_url(&data_dir)).await?;
        let store = Arc::new(SqliteKvStore::new(pool));
        let client = Arc::new(HttpGameClient::new(&config, session)?);
        let manager = BuildManager::load(store, client).await?;

        tracing::debug!(
            data_dir = %data_dir.display(),
            game_url = %config.game_url,
            "application state ready"
        );

        Ok(Self {
            manager: Arc::new(manager),
            config: Arc::new(config),
            data_dir,
        })
    }
}
