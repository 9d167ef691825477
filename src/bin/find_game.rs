//! Game-finder diagnostic.
//!
//! Lists every game on the NFL scoreboard with its ESPN game ID so the
//! operator can pick one for `.env` when switching to live tracking.
//!
//! ```text
//! cargo run --bin find_game
//! ```

use anyhow::Result;
use chrono::Local;

use gametracker::feed::{EspnClient, GameListing};
use gametracker::game::GameStatus;

#[tokio::main]
async fn main() -> Result<()> {
    let client = EspnClient::new()?;
    let listings = client.fetch_scoreboard().await?;

    if listings.is_empty() {
        println!("No NFL games found. Try again during the season or on game day.");
        return Ok(());
    }

    let now = Local::now().format("%Y-%m-%d %H:%M:%S");
    println!();
    println!("{}", "=".repeat(72));
    println!("NFL games as of {now}");
    println!("{}", "=".repeat(72));
    println!();

    for game in &listings {
        print_listing(game);
    }

    println!("To track a game, set in .env:");
    println!("  ESPN_GAME_ID={}", listings[0].id);
    println!("  DEMO_MODE=0");
    println!();

    Ok(())
}

fn print_listing(game: &GameListing) {
    let tag = match game.status {
        GameStatus::Live => "LIVE",
        GameStatus::Final => "FINAL",
        GameStatus::Pregame => "SCHEDULED",
    };
    let title = if game.short_name.is_empty() {
        format!("{} @ {}", game.away_team, game.home_team)
    } else {
        game.short_name.clone()
    };

    println!("[{tag}] {title}");
    println!("  Game ID: {}", game.id);
    println!("  {} @ {}", game.away_team, game.home_team);
    println!("  Score: {} - {}", game.away_score, game.home_score);
    println!("  Status: {}", game.detail);
    if game.status == GameStatus::Live {
        if let (Some(q), Some(clock)) = (game.quarter, game.clock.as_deref()) {
            println!("  Q{q} - {clock}");
        }
    }
    println!();
}
