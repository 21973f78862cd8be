//! HttpGameClient -- concrete [`GameClient`] implementation over reqwest.
//!
//! Requests carry the player's session as a raw `Cookie` header. The cookie
//! is wrapped in [`secrecy::SecretString`] and is only exposed when the
//! header is built; it never appears in Debug output or tracing logs.

use std::time::Duration;

use reqwest::header::{COOKIE, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use buildman_core::game::client::GameClient;
use buildman_core::game::request::{GameRequest, Method};
use buildman_types::config::GlobalConfig;
use buildman_types::error::RemoteError;

/// Environment variable holding the session cookie.
pub const SESSION_ENV: &str = "BUILDMAN_SESSION";

pub struct HttpGameClient {
    client: reqwest::Client,
    base_url: String,
    session: Option<SecretString>,
}

impl HttpGameClient {
    /// Create a client for the configured game server.
    ///
    /// Without a session every page renders as logged out, which the page
    /// readers report as undeterminable state.
    pub fn new(config: &GlobalConfig, session: Option<SecretString>) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| RemoteError::Transport {
                path: String::new(),
                message: e.to_string(),
            })?;

        if session.is_none() {
            tracing::warn!("no game session configured, set {SESSION_ENV} or pass --session");
        }

        Ok(Self {
            client,
            base_url: config.game_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Build the full URL for a server-relative path.
    fn url(&self, path: &str) -> Result<reqwest::Url, RemoteError> {
        let raw = format!("{}{}", self.base_url, path);
        reqwest::Url::parse(&raw).map_err(|e| RemoteError::InvalidUrl(format!("{raw}: {e}")))
    }

    fn cookie(&self) -> Result<Option<HeaderValue>, RemoteError> {
        let Some(session) = &self.session else {
            return Ok(None);
        };
        let mut value = HeaderValue::from_str(session.expose_secret())
            .map_err(|_| RemoteError::InvalidUrl("session cookie is not a valid header value".to_string()))?;
        value.set_sensitive(true);
        Ok(Some(value))
    }
}

impl GameClient for HttpGameClient {
    async fn send(&self, request: &GameRequest) -> Result<String, RemoteError> {
        let url = self.url(&request.path)?;
        let builder = match request.method {
            Method::Get => self.client.get(url).query(&request.params),
            Method::Form => self.client.post(url).form(&request.params),
        };
        let builder = match self.cookie()? {
            Some(cookie) => builder.header(COOKIE, cookie),
            None => builder,
        };

        tracing::debug!(%request, params = request.params.len(), "game request");
        let transport = |e: reqwest::Error| RemoteError::Transport {
            path: request.path.clone(),
            message: e.to_string(),
        };

        let response = builder.send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                path: request.path.clone(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(transport)
    }
}
