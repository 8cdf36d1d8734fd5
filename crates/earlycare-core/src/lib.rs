//! earlycare-core
//!
//! Pure domain types for the EarlyCare intake client: submissions, results,
//! profiles, health tips, and the attachment transport reference.
//! No I/O and no remote-service dependency.

pub mod attachment;
pub mod error;
pub mod models;
