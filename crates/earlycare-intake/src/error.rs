use thiserror::Error;

use earlycare_sync::QueryError;

use crate::wizard::Step;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name is required")]
    MissingName,

    #[error("age is required")]
    MissingAge,

    #[error("age must be a whole number, got {0:?}")]
    InvalidAge(String),

    #[error("submission is only possible from the last step, currently on {0:?}")]
    NotOnLastStep(Step),
}

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("attachment is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },

    #[error("attachment could not be read: {0}")]
    ReadFailed(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Attachment(#[from] AttachmentError),

    #[error("submission failed: {0}")]
    Remote(#[from] QueryError),
}
