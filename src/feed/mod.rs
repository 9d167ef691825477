//! Data source adapters.
//!
//! Both variants produce one normalized [`GameState`] per invocation:
//! a scripted demo feed, or a remote scoreboard fetch. Selection is a
//! single demo-mode flag; every failure degrades to a placeholder
//! state rather than propagating.

pub mod demo;
pub mod espn;

pub use demo::DemoFeed;
pub use espn::{EspnClient, GameListing};
