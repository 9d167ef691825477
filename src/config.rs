//! Configuration from environment variables (with `.env` support).
//!
//! Everything except the Gemini credential is read once at startup into
//! a `Settings` struct. The credential is re-read from the environment
//! (and `.env`) on every use so a key dropped into the file while the
//! process is running takes effect without a restart.

use secrecy::SecretString;

/// Default kickoff if `KICKOFF_ISO` is unset.
const DEFAULT_KICKOFF_ISO: &str = "2026-02-08T18:30:00-05:00";

/// Application settings, loaded once at process start.
#[derive(Debug, Clone)]
pub struct Settings {
    pub demo_mode: bool,
    pub kickoff_iso: String,
    pub home_team: String,
    pub away_team: String,
    pub gemini_model: String,
    pub espn_game_id: Option<String>,
    pub port: u16,
}

impl Settings {
    /// Read all settings from the environment. Call after `dotenv::dotenv()`.
    pub fn from_env() -> Self {
        Self {
            demo_mode: std::env::var("DEMO_MODE").map(|v| v == "1").unwrap_or(true),
            kickoff_iso: non_empty_var("KICKOFF_ISO")
                .unwrap_or_else(|| DEFAULT_KICKOFF_ISO.to_string()),
            home_team: non_empty_var("HOME_TEAM").unwrap_or_else(|| "Patriots".to_string()),
            away_team: non_empty_var("AWAY_TEAM").unwrap_or_else(|| "Seahawks".to_string()),
            gemini_model: non_empty_var("GEMINI_MODEL")
                .unwrap_or_else(|| "gemini-2.0-flash".to_string()),
            espn_game_id: non_empty_var("ESPN_GAME_ID"),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            demo_mode: true,
            kickoff_iso: DEFAULT_KICKOFF_ISO.to_string(),
            home_team: "Patriots".to_string(),
            away_team: "Seahawks".to_string(),
            gemini_model: "gemini-2.0-flash".to_string(),
            espn_game_id: None,
            port: 8000,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Read the Gemini API key at call time so it always reflects `.env`.
/// Strips surrounding quotes, which people paste in routinely.
pub fn gemini_api_key() -> Option<SecretString> {
    let raw = dotenv::var("GEMINI_API_KEY").ok()?;
    let cleaned = raw.trim().trim_matches('"').trim_matches('\'').trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(SecretString::new(cleaned.to_string()))
    }
}

/// Whether the credential is currently configured (presence only).
pub fn gemini_configured() -> bool {
    gemini_api_key().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert!(s.demo_mode);
        assert_eq!(s.home_team, "Patriots");
        assert_eq!(s.away_team, "Seahawks");
        assert_eq!(s.gemini_model, "gemini-2.0-flash");
        assert!(s.espn_game_id.is_none());
        assert_eq!(s.port, 8000);
    }

    #[test]
    fn test_kickoff_default_parses() {
        let s = Settings::default();
        assert!(chrono::DateTime::parse_from_rfc3339(&s.kickoff_iso).is_ok());
    }
}
