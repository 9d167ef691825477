//! Team logo resolution.
//!
//! `TEAM_LOGO_<NAME>` environment overrides win; otherwise a small
//! built-in table covers the default matchup.

/// Built-in logo URLs keyed by normalized team name.
const DEFAULT_TEAM_LOGOS: &[(&str, &str)] = &[
    (
        "seahawks",
        "https://upload.wikimedia.org/wikipedia/commons/thumb/3/38/Seattle_Seahawks_logo.svg/330px-Seattle_Seahawks_logo.svg.png",
    ),
    (
        "patriots",
        "https://upload.wikimedia.org/wikipedia/commons/thumb/b/b9/New_England_Patriots_logo.svg/330px-New_England_Patriots_logo.svg.png",
    ),
    (
        "new england patriots",
        "https://upload.wikimedia.org/wikipedia/commons/thumb/b/b9/New_England_Patriots_logo.svg/330px-New_England_Patriots_logo.svg.png",
    ),
];

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Resolve a logo URL for a team, if any.
pub fn team_logo_url(team_name: &str) -> Option<String> {
    let key = normalize(team_name);
    let env_key = format!(
        "TEAM_LOGO_{}",
        key.replace(' ', "_").replace('.', "").to_uppercase()
    );
    if let Ok(url) = std::env::var(&env_key) {
        if !url.trim().is_empty() {
            return Some(url);
        }
    }
    DEFAULT_TEAM_LOGOS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, url)| url.to_string())
}
