//! Scripted demo feed.
//!
//! A fixed sequence of canned scoring events compiled into the binary.
//! Each call returns the event at the cursor and advances it; once the
//! sequence is exhausted the last event repeats, so polling past the
//! end keeps showing the final score.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::game::{GameState, GameStatus};

/// Canned event sequence, embedded at compile time.
const DEMO_EVENTS_JSON: &str = include_str!("demo_events.json");

#[derive(Debug, Clone, Deserialize)]
struct DemoEvent {
    #[serde(default)]
    home_score: i64,
    #[serde(default)]
    away_score: i64,
    status: GameStatus,
    #[serde(default)]
    quarter: Option<u8>,
    #[serde(default)]
    clock: Option<String>,
}

/// Cursor-advanced sequence of canned game states.
pub struct DemoFeed {
    events: Vec<DemoEvent>,
    idx: usize,
}

impl DemoFeed {
    pub fn new() -> Result<Self> {
        let events: Vec<DemoEvent> =
            serde_json::from_str(DEMO_EVENTS_JSON).context("Failed to parse demo events")?;
        anyhow::ensure!(!events.is_empty(), "Demo event sequence is empty");
        Ok(Self { events, idx: 0 })
    }

    pub fn index(&self) -> usize {
        self.idx
    }

    /// Set the cursor, clamped to `[0, len]`.
    pub fn set_index(&mut self, idx: usize) {
        self.idx = idx.min(self.events.len());
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Return the state at the cursor (clamped to the last event) and
    /// advance the cursor by one.
    pub fn next_state(&mut self, home_team: &str, away_team: &str) -> GameState {
        let e = &self.events[self.idx.min(self.events.len() - 1)];
        let state = GameState {
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            home_score: e.home_score,
            away_score: e.away_score,
            status: e.status,
            quarter: e.quarter,
            clock: e.clock.clone(),
        };
        self.idx += 1;
        state
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_starts_pregame_ends_final() {
        let mut feed = DemoFeed::new().unwrap();
        let first = feed.next_state("Patriots", "Seahawks");
        assert_eq!(first.status, GameStatus::Pregame);

        let mut last = first;
        while feed.index() < feed.len() {
            last = feed.next_state("Patriots", "Seahawks");
        }
        assert_eq!(last.status, GameStatus::Final);
        assert!(last.home_score > last.away_score);
    }

    #[test]
    fn test_cursor_advances_by_one() {
        let mut feed = DemoFeed::new().unwrap();
        assert_eq!(feed.index(), 0);
        feed.next_state("H", "A");
        assert_eq!(feed.index(), 1);
        feed.next_state("H", "A");
        assert_eq!(feed.index(), 2);
    }

    #[test]
    fn test_exhausted_feed_repeats_last_event() {
        let mut feed = DemoFeed::new().unwrap();
        feed.set_index(usize::MAX); // clamps to len
        assert_eq!(feed.index(), feed.len());
        let a = feed.next_state("H", "A");
        let b = feed.next_state("H", "A");
        assert_eq!(a, b);
        assert_eq!(a.status, GameStatus::Final);
    }

    #[test]
    fn test_set_index_clamps() {
        let mut feed = DemoFeed::new().unwrap();
        feed.set_index(3);
        assert_eq!(feed.index(), 3);
        feed.set_index(feed.len() + 100);
        assert_eq!(feed.index(), feed.len());
        feed.set_index(0);
        assert_eq!(feed.index(), 0);
    }

    #[test]
    fn test_team_names_come_from_caller() {
        let mut feed = DemoFeed::new().unwrap();
        let s = feed.next_state("Home FC", "Away FC");
        assert_eq!(s.home_team, "Home FC");
        assert_eq!(s.away_team, "Away FC");
    }
}
