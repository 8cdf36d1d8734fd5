//! earlycare-intake
//!
//! The health self-assessment flow: a four-step wizard that owns the draft,
//! the attachment encoder, and the orchestrator that turns a draft into one
//! remote submission.

pub mod attachment;
pub mod error;
pub mod notice;
pub mod orchestrator;
pub mod wizard;

pub use crate::error::{AttachmentError, SubmitError, ValidationError};
pub use crate::notice::Notice;
pub use crate::orchestrator::SubmissionOrchestrator;
pub use crate::wizard::{Blocked, DraftSubmission, Step, Wizard};
