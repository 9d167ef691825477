//! Web layer: axum server for the tracker.
//!
//! Serves a self-contained HTML page and the JSON API.
//! CORS enabled for local development.

pub mod routes;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    response::Html,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::game::kickoff_countdown;
use routes::AppState;

/// The embedded page (compiled into the binary).
const INDEX_HTML: &str = include_str!("templates/index.html");

/// Build the axum router with all routes and middleware.
pub fn build_router(app: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin("*".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(serve_index))
        .route("/admin/poll", post(routes::admin_poll))
        .route("/admin/demo/reset", post(routes::admin_demo_reset))
        .route("/admin/clear/:panel", post(routes::admin_clear_panel))
        .route("/api/state", get(routes::api_state))
        .route("/api/settings", get(routes::api_settings))
        .route("/api/debug", get(routes::api_debug))
        .route("/health", get(routes::health))
        .layer(cors)
        .with_state(app)
}

/// Serve the page with the kickoff timestamp and an initial countdown
/// injected; the rest renders client-side from `/api/state`.
async fn serve_index(State(app): State<AppState>) -> Html<String> {
    // Match the API behavior: the page always has a state to show.
    {
        let mut store = app.store.write().await;
        if store.last_state.is_none() {
            store.last_state = Some(app.default_state());
        }
    }

    let seconds = kickoff_countdown(&app.settings.kickoff_iso)
        .map(|c| c.seconds)
        .unwrap_or(0);

    let html = INDEX_HTML
        .replace("__KICKOFF_ISO__", &app.settings.kickoff_iso)
        .replace("__COUNTDOWN_SECONDS__", &seconds.to_string())
        .replace("__HOME_TEAM__", &app.settings.home_team)
        .replace("__AWAY_TEAM__", &app.settings.away_team);

    Html(html)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::engine::TrackerApp;
    use crate::llm::{Commentator, MockTextGenerator};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let mut gen = MockTextGenerator::new();
        gen.expect_generate().returning(|_, n| format!("mock {n}"));
        let mut path = std::env::temp_dir();
        path.push(format!("gametracker_server_test_{}.json", uuid::Uuid::new_v4()));
        Arc::new(
            TrackerApp::new(Settings::default(), Commentator::new(Box::new(gen)), path).unwrap(),
        )
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_req(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = build_router(test_state());
        let resp = app.oneshot(get_req("/health")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_index_page() {
        let app = build_router(test_state());
        let resp = app.oneshot(get_req("/")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 200_000).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("Patriots"));
        assert!(html.contains("2026-02-08T18:30:00-05:00"));
        assert!(!html.contains("__KICKOFF_ISO__"));
    }

    #[tokio::test]
    async fn test_api_state_endpoint() {
        let app = build_router(test_state());
        let resp = app.oneshot(get_req("/api/state")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["state"]["phase"], "PREGAME");
        assert_eq!(json["meta"]["poll_count"], 0);
    }

    #[tokio::test]
    async fn test_api_state_has_no_side_effects() {
        let state = test_state();
        let app = build_router(state.clone());
        let _ = app.oneshot(get_req("/api/state")).await.unwrap();
        assert_eq!(state.store.read().await.poll_count, 0);
        assert_eq!(state.demo.read().await.index(), 0);
    }

    #[tokio::test]
    async fn test_poll_endpoint_runs_cycle() {
        let state = test_state();
        let app = build_router(state.clone());
        let resp = app.oneshot(post_req("/admin/poll")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["meta"]["poll_count"], 1);
        let _ = std::fs::remove_file(&state.state_path);
    }

    #[tokio::test]
    async fn test_clear_bad_panel_is_400() {
        let app = build_router(test_state());
        let resp = app.oneshot(post_req("/admin/clear/bogus")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["ok"], false);
    }

    #[tokio::test]
    async fn test_clear_valid_panels() {
        let state = test_state();
        for panel in ["commentary", "winprob", "recap", "all"] {
            let app = build_router(state.clone());
            let resp = app
                .oneshot(post_req(&format!("/admin/clear/{panel}")))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK, "panel {panel}");
        }
        let _ = std::fs::remove_file(&state.state_path);
    }

    #[tokio::test]
    async fn test_settings_endpoint() {
        let app = build_router(test_state());
        let resp = app.oneshot(get_req("/api/settings")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["demo_mode"], true);
        assert_eq!(json["live_mode"], false);
        assert!(json.get("gemini_configured").is_some());
    }

    #[tokio::test]
    async fn test_demo_reset_endpoint() {
        let state = test_state();
        state.poll_once().await;
        let app = build_router(state.clone());
        let resp = app.oneshot(post_req("/admin/demo/reset")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(state.demo.read().await.index(), 0);
        let _ = std::fs::remove_file(&state.state_path);
    }
}
