//! Short user-facing messages shown as transient toasts.

use std::fmt;

use crate::error::{AttachmentError, SubmitError, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    FillAllFields,
    FinishAllSteps,
    ImageTooLarge,
    ImageUnreadable,
    ImageAccepted,
    Submitted,
    SubmitFailed,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::FillAllFields => "Please fill in all fields",
            Notice::FinishAllSteps => "Please complete all steps before submitting",
            Notice::ImageTooLarge => "Image size should be less than 5MB",
            Notice::ImageUnreadable => "Could not read the selected image",
            Notice::ImageAccepted => "Image uploaded successfully",
            Notice::Submitted => "Test submitted successfully!",
            Notice::SubmitFailed => "Failed to submit test. Please try again.",
        }
    }

    pub fn is_error(self) -> bool {
        !matches!(self, Notice::ImageAccepted | Notice::Submitted)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl From<&ValidationError> for Notice {
    fn from(e: &ValidationError) -> Self {
        match e {
            ValidationError::MissingName | ValidationError::MissingAge => Notice::FillAllFields,
            ValidationError::NotOnLastStep(_) => Notice::FinishAllSteps,
            // An unparseable age only surfaces at submission.
            ValidationError::InvalidAge(_) => Notice::SubmitFailed,
        }
    }
}

impl From<&AttachmentError> for Notice {
    fn from(e: &AttachmentError) -> Self {
        match e {
            AttachmentError::TooLarge { .. } => Notice::ImageTooLarge,
            AttachmentError::ReadFailed(_) => Notice::ImageUnreadable,
        }
    }
}

impl From<&SubmitError> for Notice {
    fn from(e: &SubmitError) -> Self {
        match e {
            SubmitError::Validation(e) => e.into(),
            SubmitError::Attachment(e) => e.into(),
            SubmitError::Remote(_) => Notice::SubmitFailed,
        }
    }
}
