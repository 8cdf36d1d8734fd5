//! Logical resource names and the write → read invalidation table.

use std::fmt;

/// A cacheable remote read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    CurrentUserProfile,
    MyLatestResult,
    HealthTips,
}

impl QueryKey {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryKey::CurrentUserProfile => "current-user-profile",
            QueryKey::MyLatestResult => "my-latest-result",
            QueryKey::HealthTips => "health-tips",
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A remote write. Writes are never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKey {
    SaveProfile,
    SubmitTest,
}

impl MutationKey {
    pub fn as_str(self) -> &'static str {
        match self {
            MutationKey::SaveProfile => "save-profile",
            MutationKey::SubmitTest => "submit-test",
        }
    }

    /// Reads made stale by a successful write of this kind.
    ///
    /// | Write        | Invalidates          |
    /// |--------------|----------------------|
    /// | save profile | current-user-profile |
    /// | submit test  | my-latest-result     |
    pub fn invalidates(self) -> &'static [QueryKey] {
        match self {
            MutationKey::SaveProfile => &[QueryKey::CurrentUserProfile],
            MutationKey::SubmitTest => &[QueryKey::MyLatestResult],
        }
    }
}

impl fmt::Display for MutationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
