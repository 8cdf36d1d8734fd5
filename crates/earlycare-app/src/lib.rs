//! earlycare-app library root.
//!
//! Re-exports internal modules so that integration tests can exercise the
//! command layer directly, without going through the terminal front end.

pub mod commands;
pub mod config;
pub mod session;
pub mod state;
pub mod views;
