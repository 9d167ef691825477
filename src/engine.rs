//! The polling / state-reconciliation cycle and the app state it
//! operates on.
//!
//! `TrackerApp` is the single explicitly-owned instance of everything
//! the request handlers touch: settings, the store, the active data
//! source, and the commentary layer. The cycle itself is safe under
//! repeated invocation: an unchanged fingerprint is a counters-only
//! no-op. Locks are always released before a generation await.

use anyhow::Result;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::Settings;
use crate::feed::{DemoFeed, EspnClient};
use crate::game::{fingerprint, win_probability, GameState, GameStatus};
use crate::llm::{leader_and_pct, Commentator};
use crate::storage::{self, PersistedMeta};
use crate::store::Store;

/// Process-wide application state, shared via `Arc` with the router.
pub struct TrackerApp {
    pub settings: Settings,
    pub store: RwLock<Store>,
    pub demo: RwLock<DemoFeed>,
    pub espn: EspnClient,
    pub commentator: Commentator,
    pub state_path: PathBuf,
}

impl TrackerApp {
    pub fn new(
        settings: Settings,
        commentator: Commentator,
        state_path: PathBuf,
    ) -> Result<Self> {
        Ok(Self {
            settings,
            store: RwLock::new(Store::default()),
            demo: RwLock::new(DemoFeed::new()?),
            espn: EspnClient::new()?,
            commentator,
            state_path,
        })
    }

    /// Placeholder state for the configured matchup.
    pub fn default_state(&self) -> GameState {
        GameState::placeholder(&self.settings.home_team, &self.settings.away_team)
    }

    /// Restore the demo cursor from persisted metadata. Derived state is
    /// never restored; the store always starts fresh.
    pub async fn hydrate(&self) {
        let Some(meta) = storage::load_meta(&self.state_path) else {
            return;
        };
        if self.settings.demo_mode {
            if let Some(idx) = meta.demo_idx {
                self.demo.write().await.set_index(idx);
                info!(demo_idx = idx, "Resumed demo sequence");
            }
        }
    }

    /// Write the metadata snapshot. Failures are logged and swallowed.
    pub async fn persist(&self) {
        let meta = PersistedMeta {
            demo_mode: self.settings.demo_mode,
            demo_idx: if self.settings.demo_mode {
                Some(self.demo.read().await.index())
            } else {
                None
            },
        };
        if let Err(e) = storage::save_meta(&self.state_path, &meta) {
            debug!(error = %e, "Metadata save failed (ignored)");
        }
    }

    /// One snapshot from the active data source.
    pub async fn fetch_state(&self) -> GameState {
        if self.settings.demo_mode {
            self.demo
                .write()
                .await
                .next_state(&self.settings.home_team, &self.settings.away_team)
        } else {
            self.espn.fetch_state(&self.settings).await
        }
    }

    /// Run one polling/reconciliation cycle.
    ///
    /// Counters, timestamp, and `last_state` update on every call. New
    /// content is generated only when the score/status/quarter
    /// fingerprint differs from the one that last triggered generation.
    pub async fn poll_once(&self) {
        let state = self.fetch_state().await;
        let fp = fingerprint(&state);

        let changed = {
            let mut store = self.store.write().await;
            store.last_state = Some(state.clone());
            store.poll_count += 1;
            store.touch();
            if store.last_fingerprint.as_deref() == Some(fp.as_str()) {
                false
            } else {
                store.last_fingerprint = Some(fp);
                true
            }
        };

        if !changed {
            debug!("Fingerprint unchanged, counters-only poll");
            self.persist().await;
            return;
        }

        info!(
            home = state.home_score,
            away = state.away_score,
            status = ?state.status,
            quarter = ?state.quarter,
            "State changed, generating content"
        );

        // Generation happens with no lock held.
        let commentary = self.commentator.live_commentary(&state).await;

        let wp = win_probability(&state);
        let note = self.commentator.win_prob_note(&state, wp).await;
        let (leader, pct) = leader_and_pct(&state, wp);
        let winprob_line = format!("{leader} {pct}% — {note}");

        let recap_due = {
            let mut store = self.store.write().await;
            store.insert_commentary(commentary);
            store.winprob_home = Some(wp);
            store.insert_winprob(winprob_line);
            state.status == GameStatus::Final && store.postgame_recap.is_none()
        };

        if recap_due {
            let recent: Vec<String> = {
                let store = self.store.read().await;
                store.winprob_history.iter().take(10).cloned().collect()
            };
            let recap = self.commentator.postgame_recap(&state, &recent).await;
            let mut store = self.store.write().await;
            // A clear/reset may have raced the generation await.
            if store.postgame_recap.is_none() {
                store.postgame_recap = Some(recap);
            }
        }

        self.persist().await;
    }

    /// Reset the demo to event zero and the store to defaults.
    /// Returns false (and does nothing) outside demo mode.
    pub async fn reset_demo(&self) -> bool {
        if !self.settings.demo_mode {
            return false;
        }
        self.demo.write().await.set_index(0);
        self.store.write().await.reset(self.default_state());
        self.persist().await;
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
