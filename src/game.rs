//! Game-state domain types and the pure functions derived from them:
//! change fingerprint, heuristic win probability, display phase, and
//! the kickoff countdown.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Coarse game status as normalized from every data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Pregame,
    Live,
    Final,
}

/// Display label derived from [`GameStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Phase {
    Pregame,
    Live,
    Final,
}

/// One normalized snapshot of the game. Constructed fresh on every poll
/// and never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub home_team: String,
    pub away_team: String,
    pub home_score: i64,
    pub away_score: i64,
    pub status: GameStatus,
    pub quarter: Option<u8>,
    pub clock: Option<String>,
}

impl GameState {
    /// Zero-score pregame placeholder for the configured matchup.
    pub fn placeholder(home_team: &str, away_team: &str) -> Self {
        Self {
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            home_score: 0,
            away_score: 0,
            status: GameStatus::Pregame,
            quarter: None,
            clock: None,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.status {
            GameStatus::Final => Phase::Final,
            GameStatus::Live => Phase::Live,
            GameStatus::Pregame => Phase::Pregame,
        }
    }
}

/// The subset of fields whose change should trigger new commentary.
/// Clock is deliberately excluded so a ticking clock alone does not
/// burn generation quota.
#[derive(Serialize)]
struct FingerprintFields<'a> {
    home_score: i64,
    away_score: i64,
    status: &'a GameStatus,
    quarter: Option<u8>,
}

/// SHA-256 hex digest over the score/status/quarter subset.
/// Two states equal on those fields fingerprint identically
/// regardless of clock.
pub fn fingerprint(state: &GameState) -> String {
    let fields = FingerprintFields {
        home_score: state.home_score,
        away_score: state.away_score,
        status: &state.status,
        quarter: state.quarter,
    };
    // Struct field order gives a canonical serialization.
    let payload = serde_json::to_vec(&fields).unwrap_or_default();
    hex::encode(Sha256::digest(&payload))
}

/// Heuristic home win probability: logistic over the score margin,
/// weighted up as the game progresses. Clamped to [0.01, 0.99].
pub fn win_probability(state: &GameState) -> f64 {
    let margin = (state.home_score - state.away_score) as f64;
    let time_weight = match state.quarter.unwrap_or(1) {
        1 => 0.8,
        2 => 1.0,
        3 => 1.2,
        4 => 1.4,
        _ => 1.0,
    };
    let x = margin * 0.18 * time_weight;
    let p = 1.0 / (1.0 + (-x).exp());
    p.clamp(0.01, 0.99)
}

/// Countdown until kickoff, floored at zero once the game has started.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Countdown {
    pub h: u64,
    pub m: u64,
    pub s: u64,
    pub seconds: u64,
}

/// Compute the countdown from an ISO-8601 kickoff timestamp.
/// Returns `None` if the timestamp does not parse.
pub fn kickoff_countdown(kickoff_iso: &str) -> Option<Countdown> {
    let kickoff = DateTime::parse_from_rfc3339(kickoff_iso).ok()?;
    let now = Utc::now();
    let seconds = (kickoff.with_timezone(&Utc) - now).num_seconds().max(0) as u64;
    Some(Countdown {
        h: seconds / 3600,
        m: (seconds % 3600) / 60,
        s: seconds % 60,
        seconds,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
