//! Generative-text integration.
//!
//! Defines the `TextGenerator` trait and the `Commentator` prompt layer
//! on top of it. Generation never errors past this boundary: every call
//! returns a string, degrading to placeholders on failure.

pub mod gemini;

use async_trait::async_trait;
use serde_json::json;

use crate::game::GameState;

/// Placeholder shown when no API key is configured.
pub const NO_KEY_PLACEHOLDER: &str = "[Set GEMINI_API_KEY in .env for AI commentary.]";

/// Placeholder for rate-limit/quota failures. Contains the history
/// suppression token on purpose: it must never enter a panel.
pub const RATE_LIMIT_PLACEHOLDER: &str = "[Gemini rate limit — try again in a minute.]";

/// Placeholder for long, unclassifiable errors.
pub const GENERIC_ERROR_PLACEHOLDER: &str = "[Gemini error. Check API key and quota.]";

/// Placeholder for an empty model response.
pub const NO_RESPONSE_PLACEHOLDER: &str = "[No response]";

/// Abstraction over one-shot text generation.
///
/// Implementors send a prompt with a token budget and always return a
/// string (on failure, a classified placeholder rather than an error).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> String;
}

/// Leading team and its rounded win percentage for display.
pub fn leader_and_pct(state: &GameState, wp: f64) -> (String, u32) {
    if wp >= 0.5 {
        (state.home_team.clone(), (wp * 100.0) as u32)
    } else {
        (state.away_team.clone(), ((1.0 - wp) * 100.0) as u32)
    }
}

/// Builds the three content prompts and drives the generator.
pub struct Commentator {
    generator: Box<dyn TextGenerator>,
}

impl Commentator {
    pub fn new(generator: Box<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// 1-2 sentence live commentary on the current situation.
    pub async fn live_commentary(&self, state: &GameState) -> String {
        let state_json = json!({ "state": state }).to_string();
        let prompt = format!(
            "You are a concise, energetic football commentator. In 1-2 short \
             sentences, describe the current game situation. Be specific and \
             vivid. No preamble.\n\n\
             Game state (JSON):\n{state_json}\n\n\
             Commentary (1-2 sentences):"
        );
        self.generator.generate(&prompt, 120).await
    }

    /// One-sentence explanation of the current win probability.
    pub async fn win_prob_note(&self, state: &GameState, wp: f64) -> String {
        let (leader, pct) = leader_and_pct(state, wp);
        let quarter = state.quarter.map(|q| q.to_string()).unwrap_or_default();
        let clock = state.clock.as_deref().unwrap_or("");
        let prompt = format!(
            "Football win-probability explainer. One short sentence only: why \
             {leader} is at ~{pct}% (Q{quarter}, {clock}). Be specific.\n\n\
             One sentence:"
        );
        self.generator.generate(&prompt, 60).await
    }

    /// 2-3 sentence postgame recap from the final score and recent
    /// win-probability notes.
    pub async fn postgame_recap(&self, state: &GameState, winprob_history: &[String]) -> String {
        let (winner, loser, win_score, lose_score) = if state.home_score >= state.away_score {
            (&state.home_team, &state.away_team, state.home_score, state.away_score)
        } else {
            (&state.away_team, &state.home_team, state.away_score, state.home_score)
        };
        let notes = winprob_history
            .iter()
            .take(5)
            .cloned()
            .collect::<Vec<_>>()
            .join("; ");
        let prompt = format!(
            "You are a football recap writer. In 2-3 sentences, write a vivid, \
             punchy recap of the game. Mention the winner and score; add one \
             memorable angle (comeback, MVP moment, etc.). No bullet points.\n\n\
             Final: {winner} {win_score}, {loser} {lose_score}. \
             Recent win-prob notes: {notes}.\n\n\
             Recap (2-3 sentences):"
        );
        self.generator.generate(&prompt, 200).await
    }

    /// Tiny diagnostic call used by the debug endpoint.
    pub async fn smoke_test(&self) -> String {
        self.generator.generate("Reply with exactly: OK", 10).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameStatus;

    fn state() -> GameState {
        GameState {
            home_team: "Patriots".into(),
            away_team: "Seahawks".into(),
            home_score: 14,
            away_score: 10,
            status: GameStatus::Live,
            quarter: Some(3),
            clock: Some("8:00".into()),
        }
    }

    fn echoing_commentator() -> Commentator {
        let mut gen = MockTextGenerator::new();
        gen.expect_generate()
            .returning(|prompt, max_tokens| format!("{max_tokens}|{prompt}"));
        Commentator::new(Box::new(gen))
    }

    #[tokio::test]
    async fn test_live_commentary_embeds_state_json() {
        let c = echoing_commentator();
        let out = c.live_commentary(&state()).await;
        assert!(out.starts_with("120|"));
        assert!(out.contains("\"home_score\":14"));
        assert!(out.contains("commentator"));
    }

    #[tokio::test]
    async fn test_win_prob_note_names_leader() {
        let c = echoing_commentator();
        let out = c.win_prob_note(&state(), 0.64).await;
        assert!(out.starts_with("60|"));
        assert!(out.contains("Patriots"));
        assert!(out.contains("~64%"));
        assert!(out.contains("Q3"));
    }

    #[tokio::test]
    async fn test_win_prob_note_trailing_side() {
        let c = echoing_commentator();
        let out = c.win_prob_note(&state(), 0.35).await;
        assert!(out.contains("Seahawks"));
        assert!(out.contains("~65%"));
    }

    #[tokio::test]
    async fn test_recap_names_winner_and_notes() {
        let c = echoing_commentator();
        let mut final_state = state();
        final_state.status = GameStatus::Final;
        final_state.home_score = 24;
        final_state.away_score = 20;
        let notes = vec!["Patriots 70% — late drive".to_string()];
        let out = c.postgame_recap(&final_state, &notes).await;
        assert!(out.starts_with("200|"));
        assert!(out.contains("Patriots 24"));
        assert!(out.contains("Seahawks 20"));
        assert!(out.contains("late drive"));
    }

    #[tokio::test]
    async fn test_smoke_test_budget() {
        let c = echoing_commentator();
        let out = c.smoke_test().await;
        assert!(out.starts_with("10|"));
        assert!(out.contains("Reply with exactly: OK"));
    }

    #[test]
    fn test_leader_and_pct() {
        let s = state();
        assert_eq!(leader_and_pct(&s, 0.5), ("Patriots".to_string(), 50));
        assert_eq!(leader_and_pct(&s, 0.78), ("Patriots".to_string(), 78));
        assert_eq!(leader_and_pct(&s, 0.25), ("Seahawks".to_string(), 75));
    }
}
