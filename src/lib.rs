//! gametracker — live game tracker with AI commentary.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod assets;
pub mod config;
pub mod engine;
pub mod feed;
pub mod game;
pub mod llm;
pub mod server;
pub mod storage;
pub mod store;
