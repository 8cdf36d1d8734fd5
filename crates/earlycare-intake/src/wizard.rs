//! The intake wizard.
//!
//! A [`Wizard`] is the current [`Step`] plus the one [`DraftSubmission`] it
//! owns. Transitions take the wizard by value and hand back the next one, so
//! there is never a second copy of the form state to drift out of sync.
//!
//! Only the first step validates: name and age must be filled in before the
//! user can move on. The remaining steps hold booleans and an optional file
//! and can always be left. Submission is only offered from the last step.

use std::path::{Path, PathBuf};

use tracing::debug;

use earlycare_core::attachment::ExternalBlob;
use earlycare_core::models::submission::{FinalizedSubmission, Gender, RiskFactor};

use crate::attachment;
use crate::error::{AttachmentError, ValidationError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Step {
    #[default]
    Identity,
    Lifestyle,
    Symptoms,
    Attachment,
}

impl Step {
    pub const COUNT: u8 = 4;

    /// 1-based position.
    pub fn number(self) -> u8 {
        match self {
            Step::Identity => 1,
            Step::Lifestyle => 2,
            Step::Symptoms => 3,
            Step::Attachment => 4,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Identity => "Personal Information",
            Step::Lifestyle => "Lifestyle Factors",
            Step::Symptoms => "Symptoms Assessment",
            Step::Attachment => "Upload Image (Optional)",
        }
    }

    pub fn progress_percent(self) -> u8 {
        self.number() * 100 / Self::COUNT
    }

    /// Risk factors asked about on this step.
    pub fn risk_factors(self) -> &'static [RiskFactor] {
        match self {
            Step::Lifestyle => &[RiskFactor::Smoking, RiskFactor::Alcohol],
            Step::Symptoms => &[RiskFactor::Pain, RiskFactor::Lump, RiskFactor::WeightLoss],
            Step::Identity | Step::Attachment => &[],
        }
    }

    pub fn next(self) -> Option<Step> {
        match self {
            Step::Identity => Some(Step::Lifestyle),
            Step::Lifestyle => Some(Step::Symptoms),
            Step::Symptoms => Some(Step::Attachment),
            Step::Attachment => None,
        }
    }

    pub fn previous(self) -> Option<Step> {
        match self {
            Step::Identity => None,
            Step::Lifestyle => Some(Step::Identity),
            Step::Symptoms => Some(Step::Lifestyle),
            Step::Attachment => Some(Step::Symptoms),
        }
    }
}

/// The in-progress answers. Age stays a string until submission so the
/// field shows exactly what the user typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftSubmission {
    pub name: String,
    pub age: String,
    pub gender: Gender,
    pub smoking: bool,
    pub alcohol: bool,
    pub pain: bool,
    pub lump: bool,
    pub weight_loss: bool,
    pub attachment: Option<PathBuf>,
}

impl DraftSubmission {
    pub fn flag(&self, factor: RiskFactor) -> bool {
        match factor {
            RiskFactor::Smoking => self.smoking,
            RiskFactor::Alcohol => self.alcohol,
            RiskFactor::Pain => self.pain,
            RiskFactor::Lump => self.lump,
            RiskFactor::WeightLoss => self.weight_loss,
        }
    }

    pub fn set_flag(&mut self, factor: RiskFactor, value: bool) {
        let slot = match factor {
            RiskFactor::Smoking => &mut self.smoking,
            RiskFactor::Alcohol => &mut self.alcohol,
            RiskFactor::Pain => &mut self.pain,
            RiskFactor::Lump => &mut self.lump,
            RiskFactor::WeightLoss => &mut self.weight_loss,
        };
        *slot = value;
    }

    /// The gate on leaving the first step: both identity fields present.
    pub fn validate_identity(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.age.trim().is_empty() {
            return Err(ValidationError::MissingAge);
        }
        Ok(())
    }

    pub fn parsed_age(&self) -> Result<u32, ValidationError> {
        let age = self.age.trim();
        age.parse::<u32>()
            .map_err(|_| ValidationError::InvalidAge(age.to_string()))
    }

    /// Build the record sent to the service, with an already encoded
    /// attachment.
    pub fn finalize(
        &self,
        attachment: Option<ExternalBlob>,
    ) -> Result<FinalizedSubmission, ValidationError> {
        self.validate_identity()?;
        Ok(FinalizedSubmission {
            name: self.name.trim().to_string(),
            age: self.parsed_age()?,
            gender: self.gender,
            smoking: self.smoking,
            alcohol: self.alcohol,
            pain: self.pain,
            lump: self.lump,
            weight_loss: self.weight_loss,
            attachment,
        })
    }
}

/// A refused transition. The wizard comes back unchanged alongside the
/// reason.
#[derive(Debug)]
pub struct Blocked {
    pub wizard: Wizard,
    pub reason: ValidationError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wizard {
    step: Step,
    draft: DraftSubmission,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &DraftSubmission {
        &self.draft
    }

    pub fn into_draft(self) -> DraftSubmission {
        self.draft
    }

    /// Whether the next action is submission rather than another step.
    pub fn is_last_step(&self) -> bool {
        self.step.next().is_none()
    }

    /// The draft, if the wizard has reached the point where it may be
    /// submitted. Earlier steps refuse.
    pub fn submittable(&self) -> Result<&DraftSubmission, ValidationError> {
        if !self.is_last_step() {
            debug!(step = ?self.step, "submit blocked");
            return Err(ValidationError::NotOnLastStep(self.step));
        }
        Ok(&self.draft)
    }

    pub fn advance(self) -> Result<Wizard, Blocked> {
        if self.step == Step::Identity
            && let Err(reason) = self.draft.validate_identity()
        {
            debug!(%reason, "advance blocked");
            return Err(Blocked {
                wizard: self,
                reason,
            });
        }
        let step = self.step.next().unwrap_or(self.step);
        Ok(Wizard { step, ..self })
    }

    pub fn retreat(self) -> Wizard {
        let step = self.step.previous().unwrap_or(self.step);
        Wizard { step, ..self }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_age(&mut self, age: impl Into<String>) {
        self.draft.age = age.into();
    }

    pub fn set_gender(&mut self, gender: Gender) {
        self.draft.gender = gender;
    }

    pub fn set_flag(&mut self, factor: RiskFactor, value: bool) {
        self.draft.set_flag(factor, value);
    }

    /// Select an image for upload. Oversize or unreadable files are refused
    /// and leave any previous selection in place.
    pub async fn attach_file(&mut self, path: &Path) -> Result<u64, AttachmentError> {
        let size = attachment::check_size(path).await?;
        self.draft.attachment = Some(path.to_path_buf());
        Ok(size)
    }

    pub fn clear_attachment(&mut self) {
        self.draft.attachment = None;
    }
}
