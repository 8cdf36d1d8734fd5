use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("caller is not authorized")]
    Unauthorized,

    #[error("resource not found")]
    NotFound,

    #[error("service returned status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("background task failed: {0}")]
    Task(String),
}
