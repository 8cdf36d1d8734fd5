use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::attachment::ExternalBlob;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One of the five yes/no risk factors asked about during intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RiskFactor {
    Smoking,
    Alcohol,
    Pain,
    Lump,
    WeightLoss,
}

impl RiskFactor {
    pub const ALL: [RiskFactor; 5] = [
        RiskFactor::Smoking,
        RiskFactor::Alcohol,
        RiskFactor::Pain,
        RiskFactor::Lump,
        RiskFactor::WeightLoss,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RiskFactor::Smoking => "Smoking",
            RiskFactor::Alcohol => "Alcohol",
            RiskFactor::Pain => "Persistent Pain",
            RiskFactor::Lump => "Lump",
            RiskFactor::WeightLoss => "Weight Loss",
        }
    }

    /// Short explanation shown under the toggle.
    pub fn hint(self) -> &'static str {
        match self {
            RiskFactor::Smoking => "Regular tobacco use",
            RiskFactor::Alcohol => "Regular alcohol consumption",
            RiskFactor::Pain => "Unexplained ongoing pain",
            RiskFactor::Lump => "New or growing lump",
            RiskFactor::WeightLoss => "Significant unintended weight loss",
        }
    }
}

/// The immutable record sent to the remote service.
///
/// Only ever built in one piece at submission time; there is no way to send
/// a partially assembled submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FinalizedSubmission {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub smoking: bool,
    pub alcohol: bool,
    pub pain: bool,
    pub lump: bool,
    pub weight_loss: bool,
    #[ts(type = "{ bytes: string } | { url: string } | null")]
    pub attachment: Option<ExternalBlob>,
}

impl FinalizedSubmission {
    pub fn has(&self, factor: RiskFactor) -> bool {
        match factor {
            RiskFactor::Smoking => self.smoking,
            RiskFactor::Alcohol => self.alcohol,
            RiskFactor::Pain => self.pain,
            RiskFactor::Lump => self.lump,
            RiskFactor::WeightLoss => self.weight_loss,
        }
    }

    /// The risk factors answered "yes", in question order.
    pub fn risk_factors(&self) -> Vec<RiskFactor> {
        RiskFactor::ALL
            .into_iter()
            .filter(|f| self.has(*f))
            .collect()
    }
}
