//! Library entrypoint for nfl-props-odds.
//!
//! Exposes all modules so integration tests can import them.

pub mod api;
pub mod collector;
pub mod config;
pub mod data;
pub mod export;
pub mod state;
