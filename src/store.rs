//! In-memory display state for the running process.
//!
//! A single `Store` lives behind an `RwLock` inside the app state. It
//! holds the last normalized game state plus everything derived from it
//! (commentary/win-probability histories, recap, counters). Derived
//! state is never persisted; only the demo cursor survives restarts.

use chrono::Utc;
use std::str::FromStr;

use crate::game::GameState;

/// Hard cap on each history list.
const MAX_HISTORY: usize = 50;

/// Recency window for duplicate detection.
const DEDUPE_WINDOW: usize = 10;

/// Substring that marks rate-limit placeholders; those never enter a
/// history list.
const RATE_LIMIT_TOKEN: &str = "rate limit";

/// Process-lifetime mutable record of derived/display state.
#[derive(Debug, Default)]
pub struct Store {
    /// Fingerprint that last triggered content generation.
    pub last_fingerprint: Option<String>,

    /// Newest-first, capped, deduped.
    pub commentary: Vec<String>,
    pub winprob_history: Vec<String>,

    pub winprob_home: Option<f64>,
    /// Set at most once per game, until cleared or the demo resets.
    pub postgame_recap: Option<String>,

    pub last_state: Option<GameState>,

    pub poll_count: u64,
    pub last_update_iso: Option<String>,
}

impl Store {
    /// Insert into the commentary history with the shared dedupe/cap policy.
    pub fn insert_commentary(&mut self, text: String) {
        dedupe_insert(&mut self.commentary, text);
    }

    /// Insert into the win-probability history with the shared policy.
    pub fn insert_winprob(&mut self, text: String) {
        dedupe_insert(&mut self.winprob_history, text);
    }

    /// Stamp the update time with the current instant.
    pub fn touch(&mut self) {
        self.last_update_iso = Some(Utc::now().to_rfc3339());
    }

    /// Wipe everything back to a fresh default, keeping only the given
    /// state as the displayed snapshot. Used by the demo reset.
    pub fn reset(&mut self, fresh_state: GameState) {
        *self = Store {
            last_state: Some(fresh_state),
            ..Store::default()
        };
        self.touch();
    }

    /// Clear one display panel.
    pub fn clear_panel(&mut self, panel: Panel) {
        match panel {
            Panel::Commentary => self.commentary.clear(),
            Panel::Winprob => {
                self.winprob_history.clear();
                self.winprob_home = None;
            }
            Panel::Recap => self.postgame_recap = None,
            Panel::All => {
                self.commentary.clear();
                self.winprob_history.clear();
                self.winprob_home = None;
                self.postgame_recap = None;
            }
        }
        self.touch();
    }
}

/// A clearable display panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Commentary,
    Winprob,
    Recap,
    All,
}

/// Unknown panel name in a clear request. Surfaced to the caller as a 400.
#[derive(Debug, thiserror::Error)]
#[error("panel must be one of: commentary, winprob, recap, all")]
pub struct UnknownPanel;

impl FromStr for Panel {
    type Err = UnknownPanel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "commentary" => Ok(Panel::Commentary),
            "winprob" => Ok(Panel::Winprob),
            "recap" => Ok(Panel::Recap),
            "all" => Ok(Panel::All),
            _ => Err(UnknownPanel),
        }
    }
}

/// Lowercase and collapse all whitespace runs to single spaces.
fn normalize(s: &str) -> String {
    s.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Shared history insertion policy: reject empty or rate-limit text,
/// skip anything matching (normalized) one of the `DEDUPE_WINDOW` most
/// recent entries, then push-front and truncate to `MAX_HISTORY`.
///
/// This is an approximate recency-window dedupe, not global uniqueness.
fn dedupe_insert(buf: &mut Vec<String>, text: String) {
    let t = text.trim();
    if t.is_empty() || t.to_lowercase().contains(RATE_LIMIT_TOKEN) {
        return;
    }
    let nt = normalize(t);
    if buf.iter().take(DEDUPE_WINDOW).any(|e| normalize(e) == nt) {
        return;
    }
    buf.insert(0, t.to_string());
    buf.truncate(MAX_HISTORY);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
