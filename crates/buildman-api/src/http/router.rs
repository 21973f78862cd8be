//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS (only the game's own origin) and tracing.

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method, Uri};
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(game_origin(&state.config.game_url))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    let api_routes = Router::new()
        // Build CRUD
        .route(
            "/builds",
            get(handlers::build::list_builds).post(handlers::build::create_build),
        )
        .route(
            "/builds/{id}",
            get(handlers::build::get_build)
                .put(handlers::build::update_build)
                .delete(handlers::build::delete_build),
        )
        .route(
            "/builds/{id}/duplicate",
            post(handlers::build::duplicate_build),
        )
        .route("/builds/{id}/equal", post(handlers::build::equal_build))
        // Export / import
        .route("/export", get(handlers::build::export_builds))
        .route("/import", post(handlers::build::import_builds))
        // Active build
        .route("/current", get(handlers::current::get_current))
        .route("/current/change", post(handlers::current::change_current));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `scheme://authority` of the game url, the only origin browsers may call from.
fn origin_of(game_url: &str) -> Option<HeaderValue> {
    let uri = game_url.parse::<Uri>().ok()?;
    let origin = format!("{}://{}", uri.scheme_str()?, uri.authority()?);
    HeaderValue::from_str(&origin).ok()
}

fn game_origin(game_url: &str) -> AllowOrigin {
    match origin_of(game_url) {
        Some(origin) => AllowOrigin::exact(origin),
        None => {
            tracing::warn!(game_url, "game url has no origin, cross-origin requests are refused");
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    }
}

/// GET /health
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use tower::ServiceExt;

    use crate::state::testing;

    async fn call(
        router: &Router,
        method: Method,
        uri: &str,
        body: Option<String>,
    ) -> (StatusCode, serde_json::Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if body.is_some() {
            request = request.header("content-type", "application/json");
        }
        let request = request
            .body(body.map(Body::from).unwrap_or_else(Body::empty))
            .unwrap();

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let (_dir, state) = testing::state().await;
        let router = build_router(state);
        let (status, json) = call(&router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_build_crud_flow() {
        let (_dir, state) = testing::state().await;
        let router = build_router(state);

        let (status, created) = call(&router, Method::POST, "/api/v1/builds", None).await;
        assert_eq!(status, StatusCode::OK);
        let id = created["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(created["data"]["name"], "Новый билд 1");

        let mut build = created["data"].clone();
        build["name"] = "Arena".into();
        build["fraction"] = "51".into();
        let (status, updated) = call(
            &router,
            Method::PUT,
            &format!("/api/v1/builds/{id}"),
            Some(build.to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["data"]["fraction"], "51");

        let (status, copy) = call(
            &router,
            Method::POST,
            &format!("/api/v1/builds/{id}/duplicate"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(copy["data"]["name"], "Arena копия");

        let (_, list) = call(&router, Method::GET, "/api/v1/builds", None).await;
        assert_eq!(list["data"].as_array().unwrap().len(), 2);

        let (status, removed) = call(
            &router,
            Method::DELETE,
            &format!("/api/v1/builds/{id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(removed["data"]["removed"]["id"], id.as_str());
        assert_eq!(removed["data"]["next"]["name"], "Arena копия");

        let (status, missing) =
            call(&router, Method::GET, &format!("/api/v1/builds/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(missing["errors"][0]["code"], "BUILD_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_update_rejects_mismatched_id_and_unknown_ids() {
        let (_dir, state) = testing::state().await;
        let build = state.manager.repository().create_default().await.unwrap();
        let router = build_router(state);
        let uri = format!("/api/v1/builds/{}", build.id);

        let mut other = serde_json::to_value(&build).unwrap();
        other["id"] = "someone-else".into();
        let (status, _) = call(&router, Method::PUT, &uri, Some(other.to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut unknown = serde_json::to_value(&build).unwrap();
        unknown["skill"] = serde_json::json!(["flying"]);
        let (status, json) = call(&router, Method::PUT, &uri, Some(unknown.to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["errors"][0]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_export_import_round_trip_and_rejection() {
        let (_dir, state) = testing::state().await;
        state.manager.repository().create_default().await.unwrap();
        let router = build_router(state.clone());

        let (_, export) = call(&router, Method::GET, "/api/v1/export", None).await;
        let payload = export["data"].to_string();

        let (status, json) =
            call(&router, Method::POST, "/api/v1/import", Some("{\"not\":\"array\"}".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["errors"][0]["code"], "IMPORT_REJECTED");
        assert_eq!(state.manager.repository().len().await, 1);

        let (status, json) = call(&router, Method::POST, "/api/v1/import", Some(payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["imported"], 1);
    }

    #[tokio::test]
    async fn test_change_clear_and_failed_apply() {
        let (_dir, state) = testing::state().await;
        let build = state.manager.repository().create_default().await.unwrap();
        let router = build_router(state);

        let (status, json) = call(
            &router,
            Method::POST,
            "/api/v1/current/change",
            Some(r#"{"id":null}"#.to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["state"], "empty");

        let (status, json) = call(
            &router,
            Method::POST,
            "/api/v1/current/change",
            Some(serde_json::json!({ "id": build.id, "force": true }).to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["errors"][0]["code"], "REMOTE_ERROR");

        let (_, current) = call(&router, Method::GET, "/api/v1/current", None).await;
        assert_eq!(current["data"]["state"], "empty");
        assert_eq!(current["data"]["expired"], false);

        let (status, _) = call(
            &router,
            Method::POST,
            "/api/v1/current/change",
            Some(r#"{"id":"missing"}"#.to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_equal_compares_the_posted_edit() {
        let (_dir, state) = testing::state().await;
        state.manager.repository().create_default().await.unwrap();
        let second = state.manager.repository().create_default().await.unwrap();
        let router = build_router(state);
        let uri = format!("/api/v1/builds/{}/equal", second.id);

        let unchanged = serde_json::to_value(&second).unwrap();
        let (status, json) = call(&router, Method::POST, &uri, Some(unchanged.to_string())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["index"], 1);
        assert_eq!(json["data"]["current"], false);

        let mut edited = serde_json::to_value(&second).unwrap();
        edited["army"] = serde_json::json!([9, 9, 9, 9, 9, 9, 9]);
        let (status, json) = call(&router, Method::POST, &uri, Some(edited.to_string())).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["data"]["index"].is_null());
        assert_eq!(json["data"]["current"], false);

        let (status, _) = call(
            &router,
            Method::POST,
            "/api/v1/builds/missing/equal",
            Some(unchanged.to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_rejects_repeated_skills() {
        let (_dir, state) = testing::state().await;
        let build = state.manager.repository().create_default().await.unwrap();
        let router = build_router(state.clone());

        let mut repeated = serde_json::to_value(&build).unwrap();
        repeated["skill"] = serde_json::json!(["tactics", "tactics"]);
        let (status, json) = call(
            &router,
            Method::PUT,
            &format!("/api/v1/builds/{}", build.id),
            Some(repeated.to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["errors"][0]["code"], "VALIDATION_ERROR");
        assert_eq!(state.manager.repository().get(&build.id).await, Some(build));
    }

    async fn allowed_origin(router: &Router, origin: &str) -> Option<String> {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/v1/current")
            .header("origin", origin)
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        response
            .headers()
            .get("access-control-allow-origin")
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_cors_allows_only_the_game_origin() {
        let (_dir, state) = testing::state().await;
        let router = build_router(state);

        assert_eq!(
            allowed_origin(&router, "http://127.0.0.1:9").await.as_deref(),
            Some("http://127.0.0.1:9")
        );
        assert_eq!(allowed_origin(&router, "https://evil.example").await, None);
    }

    #[test]
    fn test_origin_of_game_url() {
        assert_eq!(
            origin_of("https://www.heroeswm.ru/home.php").unwrap(),
            "https://www.heroeswm.ru"
        );
        assert_eq!(origin_of("http://127.0.0.1:9").unwrap(), "http://127.0.0.1:9");
        assert!(origin_of("not a url").is_none());
    }
}
