//! GameClient trait definition.
//!
//! The orchestrator and the remote state reader only ever talk to the game
//! through this trait. The reqwest-backed implementation lives in
//! buildman-infra.

use buildman_types::error::RemoteError;

use super::request::GameRequest;

/// Issues one request against the authenticated game session and returns
/// the response body as text.
///
/// Implementations must not retry: a failed request is reported once and
/// the caller decides what to abort.
pub trait GameClient: Send + Sync {
    fn send(
        &self,
        request: &GameRequest,
    ) -> impl std::future::Future<Output = Result<String, RemoteError>> + Send;
}
