use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid data URL: {0}")]
    InvalidDataUrl(String),

    #[error("attachment is not held inline: {0}")]
    NotInline(String),
}
