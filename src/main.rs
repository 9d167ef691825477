//! gametracker — live game tracker with AI commentary.
//!
//! Entry point. Loads configuration from the environment, initialises
//! structured logging, restores the demo cursor from disk, and serves
//! the dashboard until interrupted.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use gametracker::config::{self, Settings};
use gametracker::engine::TrackerApp;
use gametracker::llm::gemini::GeminiClient;
use gametracker::llm::Commentator;
use gametracker::server;
use gametracker::storage;

const BANNER: &str = r#"
  ____                     _____               _
 / ___| __ _ _ __ ___   __|_   _| __ __ _  ___| | _____ _ __
| |  _ / _` | '_ ` _ \ / _ \| || '__/ _` |/ __| |/ / _ \ '__|
| |_| | (_| | | | | | |  __/| || | | (_| | (__|   <  __/ |
 \____|\__,_|_| |_| |_|\___||_||_|  \__,_|\___|_|\_\___|_|

  Live scoreboard · AI commentary · win probability
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let settings = Settings::from_env();

    init_logging();

    println!("{BANNER}");
    info!(
        demo_mode = settings.demo_mode,
        home = %settings.home_team,
        away = %settings.away_team,
        model = %settings.gemini_model,
        espn_game_id_set = settings.espn_game_id.is_some(),
        "gametracker starting up"
    );

    if config::gemini_configured() {
        info!("Gemini API key loaded. AI commentary enabled.");
    } else {
        warn!("GEMINI_API_KEY not set. Put your key in .env — AI panels will show placeholder text.");
    }

    let gemini = GeminiClient::new(settings.gemini_model.clone())?;
    let commentator = Commentator::new(Box::new(gemini));
    let state_path = PathBuf::from(storage::DEFAULT_STATE_FILE);

    let app = Arc::new(TrackerApp::new(settings.clone(), commentator, state_path)?);

    // Only the demo cursor survives restarts; display state starts fresh.
    app.hydrate().await;

    let router = server::build_router(app);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], settings.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(port = settings.port, "Serving on http://localhost:{}", settings.port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("gametracker shut down cleanly.");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received.");
    }
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("gametracker=info"));

    let json_logging = std::env::var("GAMETRACKER_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
