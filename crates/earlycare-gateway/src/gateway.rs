use std::future::Future;
use std::pin::Pin;

use earlycare_core::models::profile::UserProfile;
use earlycare_core::models::result::TestResult;
use earlycare_core::models::submission::FinalizedSubmission;
use earlycare_core::models::tip::HealthTip;

use crate::error::GatewayError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Operations exposed by the remote service to the signed-in caller.
///
/// The service owns persistence, authorization and risk scoring; the client
/// only calls these and reacts to the responses.
///
/// Methods return boxed futures for dyn compatibility.
pub trait Gateway: Send + Sync {
    /// The caller's profile, or `None` if they have not created one.
    fn get_caller_user_profile(
        &self,
    ) -> BoxFuture<'_, Result<Option<UserProfile>, GatewayError>>;

    fn save_caller_user_profile(
        &self,
        profile: UserProfile,
    ) -> BoxFuture<'_, Result<(), GatewayError>>;

    /// The caller's latest result, or `None` before their first submission.
    fn get_my_results(&self) -> BoxFuture<'_, Result<Option<TestResult>, GatewayError>>;

    /// Submit a completed assessment. The returned result supersedes any
    /// previous one for the caller.
    fn submit_test(
        &self,
        submission: FinalizedSubmission,
    ) -> BoxFuture<'_, Result<TestResult, GatewayError>>;

    fn get_all_health_tips(&self) -> BoxFuture<'_, Result<Vec<HealthTip>, GatewayError>>;
}
