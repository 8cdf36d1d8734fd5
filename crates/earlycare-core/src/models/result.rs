use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::submission::FinalizedSubmission;

/// Risk level assigned by the remote service. Never computed client-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    /// Badge text, e.g. `HIGH RISK`.
    pub fn badge(self) -> String {
        format!("{} RISK", self.as_str().to_uppercase())
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The caller's latest result, as stored by the remote service.
///
/// A newer submission replaces it outright; there is at most one per caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TestResult {
    pub timestamp: jiff::Timestamp,
    pub advice: String,
    pub risk_level: RiskLevel,
    pub submission: FinalizedSubmission,
}
