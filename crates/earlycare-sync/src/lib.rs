//! earlycare-sync
//!
//! Client-side view of the remote service's records. Every remote resource
//! is a cache entry keyed by [`QueryKey`]; reads are de-duplicated per key
//! and writes invalidate the entries listed in [`MutationKey::invalidates`].

pub mod cache;
pub mod error;
pub mod keys;
pub mod queries;
pub mod state;

pub use crate::cache::QueryCache;
pub use crate::error::QueryError;
pub use crate::keys::{MutationKey, QueryKey};
pub use crate::queries::Queries;
pub use crate::state::QueryState;
