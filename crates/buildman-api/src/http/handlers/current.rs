//! Active build handlers: status and change requests.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use tracing::Instrument;

use buildman_observe::change_attrs::{BUILD_NAME, CHANGE_ORIGIN, ORIGIN_HTTP};
use buildman_types::build::BuildId;
use buildman_types::current::ActiveStatus;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Body of `POST /api/v1/current/change`. A `null` id clears the selection.
#[derive(Debug, Deserialize)]
pub struct ChangeRequest {
    pub id: Option<String>,
    #[serde(default)]
    pub force: bool,
}

/// GET /api/v1/current
pub async fn get_current(State(state): State<AppState>) -> Json<ApiResponse<ActiveStatus>> {
    let start = Instant::now();
    let status = state.manager.status().await;
    Json(ApiResponse::success(status, start).with_link("self", "/api/v1/current"))
}

/// POST /api/v1/current/change - Apply a build (or clear) and wait for the
/// run to settle. Changes queue behind any run already in progress.
pub async fn change_current(
    State(state): State<AppState>,
    Json(body): Json<ChangeRequest>,
) -> Result<Json<ApiResponse<ActiveStatus>>, AppError> {
    let start = Instant::now();

    match body.id {
        None => state.manager.clear().await?,
        Some(id) => {
            let build = state
                .manager
                .repository()
                .get(&BuildId::from(id.as_str()))
                .await
                .ok_or(AppError::NotFound(id))?;
            let span = tracing::info_span!(
                "request",
                { CHANGE_ORIGIN } = ORIGIN_HTTP,
                { BUILD_NAME } = build.name.as_str()
            );
            state
                .manager
                .apply(build, body.force)
                .instrument(span)
                .await?;
        }
    }

    let status = state.manager.status().await;
    Ok(Json(ApiResponse::success(status, start).with_link("self", "/api/v1/current")))
}
