//! Build CRUD handlers for the REST API.

use std::collections::HashSet;
use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};

use buildman_types::build::{Build, BuildId};
use buildman_types::error::RepositoryError;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

async fn stored(state: &AppState, id: &str) -> Result<Build, AppError> {
    state
        .manager
        .repository()
        .get(&BuildId::from(id))
        .await
        .ok_or_else(|| AppError::NotFound(id.to_string()))
}

/// Reject builds that reference ids outside the catalogs or repeat a skill.
fn check_catalogs(state: &AppState, build: &Build) -> Result<(), AppError> {
    let catalogs = state.manager.catalogs();
    if build.name.is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }
    if !catalogs.fraction.contains(&build.fraction) {
        return Err(AppError::Validation(format!("unknown fraction '{}'", build.fraction)));
    }
    if !catalogs.inventory.contains(&build.inventory) {
        return Err(AppError::Validation(format!("unknown inventory set '{}'", build.inventory)));
    }
    let mut seen = HashSet::new();
    for skill in &build.skill {
        if !catalogs.skill.contains(skill) {
            return Err(AppError::Validation(format!("unknown skill '{skill}'")));
        }
        if !seen.insert(skill) {
            return Err(AppError::Validation(format!("skill '{skill}' listed more than once")));
        }
    }
    Ok(())
}

/// GET /api/v1/builds
pub async fn list_builds(State(state): State<AppState>) -> Json<ApiResponse<Vec<Build>>> {
    let start = Instant::now();
    let builds = state.manager.repository().list().await;
    Json(ApiResponse::success(builds, start).with_link("self", "/api/v1/builds"))
}

/// POST /api/v1/builds - Create a build made of defaults.
pub async fn create_build(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Build>>, AppError> {
    let start = Instant::now();
    let build = state.manager.repository().create_default().await?;
    let href = format!("/api/v1/builds/{}", build.id);
    Ok(Json(ApiResponse::success(build, start).with_link("self", &href)))
}

/// GET /api/v1/builds/{id}
pub async fn get_build(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Build>>, AppError> {
    let start = Instant::now();
    let build = stored(&state, &id).await?;
    let href = format!("/api/v1/builds/{id}");
    Ok(Json(ApiResponse::success(build, start).with_link("self", &href)))
}

/// PUT /api/v1/builds/{id} - Replace a build. The body must carry the same id.
pub async fn update_build(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Build>,
) -> Result<Json<ApiResponse<Build>>, AppError> {
    let start = Instant::now();
    if body.id.as_str() != id {
        return Err(AppError::Validation(format!(
            "body id '{}' does not match path id '{id}'",
            body.id
        )));
    }
    check_catalogs(&state, &body)?;

    let updated = state
        .manager
        .update(&body)
        .await?
        .ok_or_else(|| AppError::NotFound(id.clone()))?;
    let href = format!("/api/v1/builds/{id}");
    Ok(Json(ApiResponse::success(updated, start).with_link("self", &href)))
}

/// DELETE /api/v1/builds/{id} - Returns the removed build and its successor.
pub async fn delete_build(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let build = stored(&state, &id).await?;
    let removed = state
        .manager
        .repository()
        .remove(&build)
        .await?
        .ok_or_else(|| AppError::NotFound(id.clone()))?;

    let data = serde_json::json!({
        "removed": removed.removed,
        "next": removed.next,
    });
    Ok(Json(ApiResponse::success(data, start)))
}

/// POST /api/v1/builds/{id}/duplicate
pub async fn duplicate_build(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Build>>, AppError> {
    let start = Instant::now();
    let build = stored(&state, &id).await?;
    let copy = state
        .manager
        .repository()
        .duplicate(&build)
        .await?
        .ok_or_else(|| AppError::NotFound(id.clone()))?;
    let href = format!("/api/v1/builds/{}", copy.id);
    Ok(Json(ApiResponse::success(copy, start).with_link("self", &href)))
}

/// POST /api/v1/builds/{id}/equal - Compare an edited build with the saved
/// list and the active build. `index` is null once the edit differs from
/// the stored entry.
pub async fn equal_build(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Build>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    if body.id.as_str() != id {
        return Err(AppError::Validation(format!(
            "body id '{}' does not match path id '{id}'",
            body.id
        )));
    }
    stored(&state, &id).await?;
    let index = state.manager.repository().find_equal(&body).await;
    let current = state.manager.tracker().equals(&body).await;

    let data = serde_json::json!({ "index": index, "current": current });
    Ok(Json(ApiResponse::success(data, start)))
}

/// GET /api/v1/export - The build list in its export format.
pub async fn export_builds(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let payload = state.manager.repository().serialize().await?;
    let data: serde_json::Value = serde_json::from_str(&payload)
        .map_err(|e| AppError::Repository(RepositoryError::Serialization(e.to_string())))?;
    Ok(Json(ApiResponse::success(data, start)))
}

/// POST /api/v1/import - Replace every build with the posted export.
/// The body is the raw export text; nothing changes if it is rejected.
pub async fn import_builds(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let repository = state.manager.repository();
    repository.validate_import(&body)?;
    if !repository.unserialize(&body).await? {
        return Err(AppError::Validation("import rejected".to_string()));
    }

    let data = serde_json::json!({ "imported": repository.len().await });
    Ok(Json(ApiResponse::success(data, start).with_link("builds", "/api/v1/builds")))
}
