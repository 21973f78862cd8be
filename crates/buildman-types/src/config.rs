//! Global configuration types for buildman.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls which
//! game server is driven and how requests against it are issued.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the build manager.
///
/// Loaded from `~/.buildman/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Base URL of the game server (no trailing slash needed).
    #[serde(default = "default_game_url")]
    pub game_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// User-Agent header sent with every game request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_game_url() -> String {
    "https://www.heroeswm.ru".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("buildman/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            game_url: default_game_url(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}
