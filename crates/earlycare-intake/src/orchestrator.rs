//! Submission: draft in, one remote write out.
//!
//! The steps run strictly in order: validate, encode the attachment, build
//! the [`FinalizedSubmission`], then a single write through the query cache.
//! Nothing is sent unless every earlier step succeeded, and the draft is only
//! borrowed, so a failed submission leaves it exactly as it was.

use tracing::{info, warn};
use uuid::Uuid;

use earlycare_core::models::result::TestResult;
use earlycare_sync::Queries;

use crate::attachment;
use crate::error::SubmitError;
use crate::wizard::DraftSubmission;

#[derive(Clone)]
pub struct SubmissionOrchestrator {
    queries: Queries,
}

impl SubmissionOrchestrator {
    pub fn new(queries: Queries) -> Self {
        Self { queries }
    }

    pub fn queries(&self) -> &Queries {
        &self.queries
    }

    pub async fn submit(&self, draft: &DraftSubmission) -> Result<TestResult, SubmitError> {
        let submission_id = Uuid::new_v4();
        info!(
            submission_id = %submission_id,
            has_attachment = draft.attachment.is_some(),
            "starting submission"
        );

        draft.validate_identity()?;
        draft.parsed_age()?;

        let blob = match &draft.attachment {
            Some(path) => match attachment::encode(path).await {
                Ok(blob) => Some(blob),
                Err(e) => {
                    warn!(submission_id = %submission_id, error = %e, "attachment rejected");
                    return Err(e.into());
                }
            },
            None => None,
        };

        let finalized = draft.finalize(blob)?;

        match self.queries.submit_test(finalized).await {
            Ok(result) => {
                info!(
                    submission_id = %submission_id,
                    risk_level = %result.risk_level,
                    "submission complete"
                );
                Ok(result)
            }
            Err(e) => {
                warn!(submission_id = %submission_id, error = %e, "submission failed");
                Err(e.into())
            }
        }
    }
}
