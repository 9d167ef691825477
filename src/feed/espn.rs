//! Remote scoreboard adapter (ESPN NFL summary endpoint).
//!
//! One outbound read per invocation, fixed 10 s timeout, no retries.
//! Transport and parsing failures, and a missing game ID, all yield a
//! placeholder state with the configured matchup at 0-0.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::config::Settings;
use crate::game::{GameState, GameStatus};

const SUMMARY_URL: &str = "https://site.api.espn.com/apis/site/v2/sports/football/nfl/summary";
const SCOREBOARD_URL: &str =
    "https://site.api.espn.com/apis/site/v2/sports/football/nfl/scoreboard";

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    competitions: Vec<Competition>,
    #[serde(default)]
    header: Option<Header>,
}

#[derive(Debug, Deserialize)]
struct Header {
    #[serde(default)]
    competitions: Vec<Competition>,
}

#[derive(Debug, Deserialize)]
struct Competition {
    #[serde(default)]
    competitors: Vec<Competitor>,
    #[serde(default)]
    status: Option<CompetitionStatus>,
}

#[derive(Debug, Deserialize)]
struct Competitor {
    #[serde(rename = "homeAway", default)]
    home_away: String,
    #[serde(default)]
    team: Option<TeamInfo>,
    #[serde(default)]
    score: Option<ScoreField>,
}

#[derive(Debug, Deserialize)]
struct TeamInfo {
    #[serde(rename = "displayName", default)]
    display_name: String,
}

/// ESPN serves scores as strings in some payloads and numbers in others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScoreField {
    Num(i64),
    Text(String),
}

impl ScoreField {
    fn value(&self) -> i64 {
        match self {
            ScoreField::Num(n) => *n,
            ScoreField::Text(s) => s.trim().parse().unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompetitionStatus {
    #[serde(default)]
    period: Option<i64>,
    #[serde(rename = "displayClock", default)]
    display_clock: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<StatusType>,
}

#[derive(Debug, Deserialize)]
struct StatusType {
    #[serde(default)]
    state: String,
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScoreboardResponse {
    #[serde(default)]
    events: Vec<ScoreboardEvent>,
}

#[derive(Debug, Deserialize)]
struct ScoreboardEvent {
    #[serde(default)]
    id: String,
    #[serde(rename = "shortName", default)]
    short_name: String,
    #[serde(default)]
    status: Option<CompetitionStatus>,
    #[serde(default)]
    competitions: Vec<Competition>,
}

/// One scoreboard entry, normalized for the game-finder listing.
#[derive(Debug, Clone, PartialEq)]
pub struct GameListing {
    pub id: String,
    pub short_name: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: i64,
    pub away_score: i64,
    pub status: GameStatus,
    pub detail: String,
    pub quarter: Option<u8>,
    pub clock: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct EspnClient {
    http: Client,
}

impl EspnClient {
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .user_agent("gametracker/0.1.0")
            .build()
            .context("Failed to build scoreboard HTTP client")?;
        Ok(Self { http })
    }

    /// Fetch the current remote state, substituting a placeholder on
    /// any failure or when no game ID is configured.
    pub async fn fetch_state(&self, settings: &Settings) -> GameState {
        let Some(game_id) = settings.espn_game_id.as_deref() else {
            return GameState::placeholder(&settings.home_team, &settings.away_team);
        };

        match self.fetch_summary(game_id, settings).await {
            Ok(state) => state,
            Err(e) => {
                warn!(game_id, error = %e, "Scoreboard fetch failed, serving placeholder");
                GameState::placeholder(&settings.home_team, &settings.away_team)
            }
        }
    }

    async fn fetch_summary(&self, game_id: &str, settings: &Settings) -> Result<GameState> {
        let url = format!("{SUMMARY_URL}?event={game_id}");
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .context("Scoreboard request failed")?
            .error_for_status()
            .context("Scoreboard returned error status")?;

        let body: SummaryResponse = resp
            .json()
            .await
            .context("Failed to parse scoreboard response")?;

        Ok(normalize_summary(body, settings))
    }

    /// Fetch the league scoreboard and list every event with its game ID,
    /// so an operator can pick one for live tracking.
    pub async fn fetch_scoreboard(&self) -> Result<Vec<GameListing>> {
        let resp = self
            .http
            .get(SCOREBOARD_URL)
            .send()
            .await
            .context("Scoreboard request failed")?
            .error_for_status()
            .context("Scoreboard returned error status")?;

        let body: ScoreboardResponse = resp
            .json()
            .await
            .context("Failed to parse scoreboard response")?;

        Ok(normalize_scoreboard(body))
    }
}

/// Map the remote status vocabulary into the three-state status.
fn map_status(state: &str) -> GameStatus {
    match state.to_lowercase().as_str() {
        "pre" | "scheduled" => GameStatus::Pregame,
        "in" | "inprogress" => GameStatus::Live,
        "post" | "final" | "complete" => GameStatus::Final,
        _ => GameStatus::Pregame,
    }
}

/// Normalize a summary payload into a [`GameState`]. Competitions live
/// either at the top level or under `header` depending on game phase.
fn normalize_summary(body: SummaryResponse, settings: &Settings) -> GameState {
    let competitions = if !body.competitions.is_empty() {
        body.competitions
    } else {
        body.header.map(|h| h.competitions).unwrap_or_default()
    };

    let Some(competition) = competitions.into_iter().next() else {
        return GameState::placeholder(&settings.home_team, &settings.away_team);
    };

    let mut home_team = settings.home_team.clone();
    let mut away_team = settings.away_team.clone();
    let mut home_score = 0;
    let mut away_score = 0;

    for c in &competition.competitors {
        let name = c.team.as_ref().map(|t| t.display_name.clone());
        let score = c.score.as_ref().map(ScoreField::value).unwrap_or(0);
        match c.home_away.as_str() {
            "home" => {
                if let Some(n) = name {
                    home_team = n;
                }
                home_score = score;
            }
            "away" => {
                if let Some(n) = name {
                    away_team = n;
                }
                away_score = score;
            }
            _ => {}
        }
    }

    let (status, quarter, clock) = match competition.status {
        Some(s) => (
            map_status(s.kind.map(|k| k.state).unwrap_or_default().as_str()),
            s.period.and_then(|p| u8::try_from(p).ok()).filter(|p| *p > 0),
            s.display_clock,
        ),
        None => (GameStatus::Pregame, None, None),
    };

    GameState {
        home_team,
        away_team,
        home_score,
        away_score,
        status,
        quarter,
        clock,
    }
}

/// Flatten scoreboard events into listings. Competitor names fall back to
/// "?" here since a listing has no configured matchup to lean on.
fn normalize_scoreboard(body: ScoreboardResponse) -> Vec<GameListing> {
    body.events
        .into_iter()
        .map(|event| {
            let mut home_team = String::from("?");
            let mut away_team = String::from("?");
            let mut home_score = 0;
            let mut away_score = 0;

            if let Some(competition) = event.competitions.first() {
                for c in &competition.competitors {
                    let name = c.team.as_ref().map(|t| t.display_name.clone());
                    let score = c.score.as_ref().map(ScoreField::value).unwrap_or(0);
                    match c.home_away.as_str() {
                        "home" => {
                            if let Some(n) = name {
                                home_team = n;
                            }
                            home_score = score;
                        }
                        "away" => {
                            if let Some(n) = name {
                                away_team = n;
                            }
                            away_score = score;
                        }
                        _ => {}
                    }
                }
            }

            let (status, detail, quarter, clock) = match event.status {
                Some(s) => {
                    let (state, detail) = match s.kind {
                        Some(k) => (k.state, k.detail.unwrap_or_default()),
                        None => (String::new(), String::new()),
                    };
                    (
                        map_status(&state),
                        if detail.is_empty() {
                            String::from("Scheduled")
                        } else {
                            detail
                        },
                        s.period.and_then(|p| u8::try_from(p).ok()).filter(|p| *p > 0),
                        s.display_clock,
                    )
                }
                None => (GameStatus::Pregame, String::from("Scheduled"), None, None),
            };

            GameListing {
                id: event.id,
                short_name: event.short_name,
                home_team,
                away_team,
                home_score,
                away_score,
                status,
                detail,
                quarter,
                clock,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
