use thiserror::Error;

use earlycare_gateway::GatewayError;

use crate::keys::QueryKey;

/// Errors surfaced by cache reads and writes.
///
/// Cloneable so one failed fetch can be handed to every caller that joined it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("actor not available")]
    ActorUnavailable,

    #[error("remote call failed: {0}")]
    Remote(String),

    #[error("cached value for {0} has an unexpected type")]
    TypeMismatch(QueryKey),
}

impl From<GatewayError> for QueryError {
    fn from(e: GatewayError) -> Self {
        QueryError::Remote(e.to_string())
    }
}
