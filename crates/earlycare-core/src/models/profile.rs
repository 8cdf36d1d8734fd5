use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The caller's profile, created once after sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserProfile {
    pub name: String,
    pub email: Option<String>,
}
