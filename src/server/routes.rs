//! API route handlers.
//!
//! All endpoints return JSON except the root page. State is shared via
//! `Arc<TrackerApp>`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::assets::team_logo_url;
use crate::config;
use crate::engine::TrackerApp;
use crate::game::{GameState, Phase};
use crate::store::Panel;

pub type AppState = Arc<TrackerApp>;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// How many history entries the payload exposes (storage caps at 50).
const PAYLOAD_HISTORY_LEN: usize = 20;

#[derive(Debug, Clone, Serialize)]
pub struct StateView {
    #[serde(flatten)]
    pub state: GameState,
    pub phase: Phase,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetaView {
    pub poll_count: u64,
    pub last_update_iso: Option<String>,
    pub demo_mode: bool,
    pub live_mode: bool,
    pub espn_game_id_set: bool,
    pub demo_idx: Option<usize>,
}

/// The JSON snapshot served by `/api/state` and echoed by the admin
/// endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub state: StateView,
    pub commentary: Vec<String>,
    pub winprob_home: Option<f64>,
    pub winprob_history: Vec<String>,
    pub postgame_recap: Option<String>,
    pub meta: MetaView,
    pub away_logo: Option<String>,
    pub home_logo: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OkSnapshot {
    pub ok: bool,
    #[serde(flatten)]
    pub snapshot: Snapshot,
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub demo_mode: bool,
    pub live_mode: bool,
    pub espn_game_id_set: bool,
    pub gemini_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct DebugResponse {
    pub state_file: String,
    pub state_file_exists: bool,
    pub env_file_exists: bool,
    pub gemini_configured: bool,
    pub gemini_test: Option<String>,
    pub gemini_error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
}

/// Build the full snapshot payload from the current store contents.
pub async fn snapshot(app: &AppState) -> Snapshot {
    let (state, commentary, winprob_home, winprob_history, postgame_recap, poll_count, last_update_iso) = {
        let store = app.store.read().await;
        (
            store.last_state.clone().unwrap_or_else(|| app.default_state()),
            store.commentary.iter().take(PAYLOAD_HISTORY_LEN).cloned().collect(),
            store.winprob_home,
            store.winprob_history.iter().take(PAYLOAD_HISTORY_LEN).cloned().collect(),
            store.postgame_recap.clone(),
            store.poll_count,
            store.last_update_iso.clone(),
        )
    };

    let demo_idx = if app.settings.demo_mode {
        Some(app.demo.read().await.index())
    } else {
        None
    };

    let away_logo = team_logo_url(&state.away_team);
    let home_logo = team_logo_url(&state.home_team);
    let phase = state.phase();

    Snapshot {
        state: StateView { state, phase },
        commentary,
        winprob_home,
        winprob_history,
        postgame_recap,
        meta: MetaView {
            poll_count,
            last_update_iso,
            demo_mode: app.settings.demo_mode,
            live_mode: !app.settings.demo_mode,
            espn_game_id_set: app.settings.espn_game_id.is_some(),
            demo_idx,
        },
        away_logo,
        home_logo,
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// POST /admin/poll: run one polling/reconciliation cycle.
pub async fn admin_poll(State(app): State<AppState>) -> Json<OkSnapshot> {
    app.poll_once().await;
    Json(OkSnapshot {
        ok: true,
        snapshot: snapshot(&app).await,
    })
}

/// POST /admin/demo/reset: rewind the demo and clear the store.
pub async fn admin_demo_reset(State(app): State<AppState>) -> Json<serde_json::Value> {
    if !app.reset_demo().await {
        return Json(serde_json::json!({ "ok": true, "message": "Not in demo mode" }));
    }
    let body = OkSnapshot {
        ok: true,
        snapshot: snapshot(&app).await,
    };
    Json(serde_json::to_value(body).unwrap_or_default())
}

/// GET /api/state: current snapshot, no side effects.
pub async fn api_state(State(app): State<AppState>) -> Json<Snapshot> {
    Json(snapshot(&app).await)
}

/// POST /admin/clear/:panel: clear one display panel.
pub async fn admin_clear_panel(
    State(app): State<AppState>,
    Path(panel): Path<String>,
) -> Result<Json<OkSnapshot>, (StatusCode, Json<ErrorResponse>)> {
    let panel: Panel = panel.parse().map_err(|e: crate::store::UnknownPanel| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                ok: false,
                error: e.to_string(),
            }),
        )
    })?;

    app.store.write().await.clear_panel(panel);
    app.persist().await;

    Ok(Json(OkSnapshot {
        ok: true,
        snapshot: snapshot(&app).await,
    }))
}

/// GET /api/settings: mode flags and configuration presence.
pub async fn api_settings(State(app): State<AppState>) -> Json<SettingsResponse> {
    Json(SettingsResponse {
        demo_mode: app.settings.demo_mode,
        live_mode: !app.settings.demo_mode,
        espn_game_id_set: app.settings.espn_game_id.is_some(),
        gemini_configured: config::gemini_configured(),
    })
}

/// GET /api/debug: config paths, credential presence, and one live
/// generation test call.
pub async fn api_debug(State(app): State<AppState>) -> Json<DebugResponse> {
    let configured = config::gemini_configured();
    let (gemini_test, gemini_error) = if configured {
        let reply = app.commentator.smoke_test().await;
        if reply.contains("OK") {
            (Some("ok".to_string()), None)
        } else {
            (Some(reply), None)
        }
    } else {
        (None, Some("No API key".to_string()))
    };

    Json(DebugResponse {
        state_file: app.state_path.display().to_string(),
        state_file_exists: app.state_path.exists(),
        env_file_exists: std::path::Path::new(".env").exists(),
        gemini_configured: configured,
        gemini_test,
        gemini_error,
    })
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
