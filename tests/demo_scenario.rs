//! End-to-end demo scenario against the library crate: the scripted
//! feed drives the full poll cycle through the HTTP router, with a
//! stub generator standing in for the Gemini API.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

use gametracker::config::Settings;
use gametracker::engine::TrackerApp;
use gametracker::llm::{Commentator, TextGenerator};
use gametracker::server::build_router;

/// Deterministic generator: unique text per call, call count observable.
struct StubGenerator {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, _prompt: &str, max_tokens: u32) -> String {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        format!("stub line {n} (budget {max_tokens})")
    }
}

fn temp_state_path() -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("gametracker_scenario_{}.json", uuid::Uuid::new_v4()));
    p
}

fn build_app() -> (Arc<TrackerApp>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let commentator = Commentator::new(Box::new(StubGenerator {
        calls: Arc::clone(&calls),
    }));
    let app = Arc::new(
        TrackerApp::new(Settings::default(), commentator, temp_state_path()).unwrap(),
    );
    (app, calls)
}

async fn post_json(app: &Arc<TrackerApp>, uri: &str) -> serde_json::Value {
    let router = build_router(Arc::clone(app));
    let resp = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK, "POST {uri}");
    let bytes = axum::body::to_bytes(resp.into_body(), 200_000).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn full_demo_game_runs_to_recap() {
    let (app, calls) = build_app();

    // Pregame
    let snap = post_json(&app, "/admin/poll").await;
    assert_eq!(snap["state"]["phase"], "PREGAME");
    assert!(snap["postgame_recap"].is_null());

    // Drive the whole scripted game.
    let events = app.demo.read().await.len();
    let mut last = snap;
    for _ in 1..events {
        last = post_json(&app, "/admin/poll").await;
    }

    assert_eq!(last["state"]["phase"], "FINAL");
    assert_eq!(last["state"]["home_score"], 24);
    assert_eq!(last["state"]["away_score"], 20);
    assert_eq!(last["meta"]["poll_count"], events);
    assert!(last["postgame_recap"].as_str().unwrap().starts_with("stub line"));

    // Every scripted event has a distinct fingerprint, so each poll
    // inserted commentary (capped at the payload's 20).
    assert_eq!(last["commentary"].as_array().unwrap().len(), 11.min(20));

    // Polling past the end repeats the finale: counters move, content
    // does not.
    let before = calls.load(Ordering::SeqCst);
    let noop = post_json(&app, "/admin/poll").await;
    assert_eq!(noop["meta"]["poll_count"], events + 1);
    assert_eq!(calls.load(Ordering::SeqCst), before);
    assert_eq!(noop["postgame_recap"], last["postgame_recap"]);

    let _ = std::fs::remove_file(&app.state_path);
}

#[tokio::test]
async fn reset_clears_everything_and_rewinds() {
    let (app, _) = build_app();

    for _ in 0..5 {
        post_json(&app, "/admin/poll").await;
    }
    let snap = post_json(&app, "/admin/demo/reset").await;
    assert_eq!(snap["ok"], true);
    assert_eq!(snap["meta"]["poll_count"], 0);
    assert_eq!(snap["meta"]["demo_idx"], 0);
    assert!(snap["commentary"].as_array().unwrap().is_empty());
    assert_eq!(snap["state"]["phase"], "PREGAME");

    // Next poll replays event zero.
    let snap = post_json(&app, "/admin/poll").await;
    assert_eq!(snap["meta"]["demo_idx"], 1);
    assert_eq!(snap["state"]["status"], "pregame");

    let _ = std::fs::remove_file(&app.state_path);
}

#[tokio::test]
async fn restart_resumes_demo_cursor_with_fresh_store() {
    let (app, _) = build_app();
    for _ in 0..3 {
        post_json(&app, "/admin/poll").await;
    }
    let path = app.state_path.clone();

    // "Restart": a new app over the same state file.
    let commentator = Commentator::new(Box::new(StubGenerator {
        calls: Arc::new(AtomicUsize::new(0)),
    }));
    let app2 = Arc::new(TrackerApp::new(Settings::default(), commentator, path.clone()).unwrap());
    app2.hydrate().await;

    assert_eq!(app2.demo.read().await.index(), 3);
    let store = app2.store.read().await;
    assert_eq!(store.poll_count, 0);
    assert!(store.commentary.is_empty());
    assert!(store.last_fingerprint.is_none());
    drop(store);

    let _ = std::fs::remove_file(&path);
}
