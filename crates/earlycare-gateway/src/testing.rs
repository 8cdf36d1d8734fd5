//! A scripted in-memory [`Gateway`] for tests in downstream crates.
//!
//! Enabled with the `test-util` feature.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;

use earlycare_core::models::profile::UserProfile;
use earlycare_core::models::result::{RiskLevel, TestResult};
use earlycare_core::models::submission::{FinalizedSubmission, Gender};
use earlycare_core::models::tip::HealthTip;

use crate::error::GatewayError;
use crate::gateway::{BoxFuture, Gateway};

/// Answers from whatever the test put in its fields and counts every read.
/// Submissions are recorded and become the latest result.
#[derive(Default)]
pub struct ScriptedGateway {
    pub profile: Mutex<Option<UserProfile>>,
    pub latest: Mutex<Option<TestResult>>,
    pub tips: Mutex<Vec<HealthTip>>,
    pub submissions: Mutex<Vec<FinalizedSubmission>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub profile_reads: AtomicUsize,
    pub result_reads: AtomicUsize,
    pub tip_reads: AtomicUsize,
    /// When set, every read waits for a notification before answering.
    pub hold_reads: Option<Arc<Notify>>,
}

impl ScriptedGateway {
    async fn gate(&self) -> Result<(), GatewayError> {
        if let Some(hold) = &self.hold_reads {
            hold.notified().await;
        }
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(GatewayError::Status(503));
        }
        Ok(())
    }

    fn write_gate(&self) -> Result<(), GatewayError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(GatewayError::Transport("connection reset".to_string()));
        }
        Ok(())
    }
}

impl Gateway for ScriptedGateway {
    fn get_caller_user_profile(&self) -> BoxFuture<'_, Result<Option<UserProfile>, GatewayError>> {
        Box::pin(async move {
            self.profile_reads.fetch_add(1, Ordering::SeqCst);
            self.gate().await?;
            Ok(lock(&self.profile).clone())
        })
    }

    fn save_caller_user_profile(
        &self,
        profile: UserProfile,
    ) -> BoxFuture<'_, Result<(), GatewayError>> {
        Box::pin(async move {
            self.write_gate()?;
            *lock(&self.profile) = Some(profile);
            Ok(())
        })
    }

    fn get_my_results(&self) -> BoxFuture<'_, Result<Option<TestResult>, GatewayError>> {
        Box::pin(async move {
            self.result_reads.fetch_add(1, Ordering::SeqCst);
            self.gate().await?;
            Ok(lock(&self.latest).clone())
        })
    }

    fn submit_test(
        &self,
        submission: FinalizedSubmission,
    ) -> BoxFuture<'_, Result<TestResult, GatewayError>> {
        Box::pin(async move {
            self.write_gate()?;
            lock(&self.submissions).push(submission.clone());
            let advice = format!("advice for {}", submission.name);
            let result = result_with(&advice, submission);
            *lock(&self.latest) = Some(result.clone());
            Ok(result)
        })
    }

    fn get_all_health_tips(&self) -> BoxFuture<'_, Result<Vec<HealthTip>, GatewayError>> {
        Box::pin(async move {
            self.tip_reads.fetch_add(1, Ordering::SeqCst);
            self.gate().await?;
            Ok(lock(&self.tips).clone())
        })
    }
}

/// A submission with no risk factors and no attachment.
pub fn submission(name: &str, age: u32) -> FinalizedSubmission {
    FinalizedSubmission {
        name: name.to_string(),
        age,
        gender: Gender::Male,
        smoking: false,
        alcohol: false,
        pain: false,
        lump: false,
        weight_loss: false,
        attachment: None,
    }
}

pub fn result_with(advice: &str, submission: FinalizedSubmission) -> TestResult {
    TestResult {
        timestamp: jiff::Timestamp::now(),
        advice: advice.to_string(),
        risk_level: RiskLevel::Low,
        submission,
    }
}

// Ignores poisoning left behind by a failed assertion in another test.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
