use std::sync::{Arc, Mutex};

use earlycare_app::commands;
use earlycare_app::config::{EarlyCareConfig, Identity};
use earlycare_app::state::AppState;
use earlycare_app::views::{ProfileGate, ReportView, Screen, TipsView};
use earlycare_core::models::profile::UserProfile;
use earlycare_core::models::result::{RiskLevel, TestResult};
use earlycare_core::models::submission::{FinalizedSubmission, RiskFactor};
use earlycare_core::models::tip::{HealthTip, fallback_tips};
use earlycare_gateway::{Actor, ActorHandle, ActorPublisher, BoxFuture, Gateway, GatewayError};
use earlycare_intake::Step;

/// Remembers what it was sent and answers with fixed risk levels.
#[derive(Default)]
struct MemoryService {
    profile: Mutex<Option<UserProfile>>,
    latest: Mutex<Option<TestResult>>,
    received: Mutex<Vec<FinalizedSubmission>>,
}

impl Gateway for MemoryService {
    fn get_caller_user_profile(&self) -> BoxFuture<'_, Result<Option<UserProfile>, GatewayError>> {
        Box::pin(async move { Ok(self.profile.lock().unwrap().clone()) })
    }

    fn save_caller_user_profile(
        &self,
        profile: UserProfile,
    ) -> BoxFuture<'_, Result<(), GatewayError>> {
        Box::pin(async move {
            *self.profile.lock().unwrap() = Some(profile);
            Ok(())
        })
    }

    fn get_my_results(&self) -> BoxFuture<'_, Result<Option<TestResult>, GatewayError>> {
        Box::pin(async move { Ok(self.latest.lock().unwrap().clone()) })
    }

    fn submit_test(
        &self,
        submission: FinalizedSubmission,
    ) -> BoxFuture<'_, Result<TestResult, GatewayError>> {
        Box::pin(async move {
            let risk_level = if submission.risk_factors().is_empty() {
                RiskLevel::Low
            } else {
                RiskLevel::High
            };
            self.received.lock().unwrap().push(submission.clone());
            let result = TestResult {
                timestamp: jiff::Timestamp::now(),
                advice: "Keep up the healthy habits.".to_string(),
                risk_level,
                submission,
            };
            *self.latest.lock().unwrap() = Some(result.clone());
            Ok(result)
        })
    }

    fn get_all_health_tips(&self) -> BoxFuture<'_, Result<Vec<HealthTip>, GatewayError>> {
        Box::pin(async move { Ok(Vec::new()) })
    }
}

fn config() -> EarlyCareConfig {
    EarlyCareConfig::new("http://127.0.0.1:9", Identity::Anonymous)
}

fn unresolved() -> (AppState, ActorPublisher) {
    let (publisher, handle) = ActorHandle::channel();
    // The state gets a publisher of its own; the test keeps the one wired
    // to the handle.
    let (detached, _) = ActorHandle::channel();
    (AppState::new(config(), detached, handle), publisher)
}

fn signed_in(service: Arc<MemoryService>) -> AppState {
    let (publisher, handle) = ActorHandle::channel();
    publisher.resolve(Actor::new(service, true));
    AppState::new(config(), publisher, handle)
}

#[tokio::test]
async fn nothing_loads_before_the_actor_resolves() {
    let (state, publisher) = unresolved();

    assert_eq!(commands::profile_gate(&state).await, ProfileGate::Loading);
    assert_eq!(commands::tips(&state).await, TipsView::Tips(fallback_tips()));
    assert_eq!(commands::report(&state).await, ReportView::Loading);
    assert!(commands::navigate(&state, Screen::Test).await.is_err());

    publisher.resolve(Actor::new(Arc::new(MemoryService::default()), true));
    assert_eq!(commands::profile_gate(&state).await, ProfileGate::SetupRequired);
}

#[tokio::test]
async fn profile_setup_then_greeting() {
    let state = signed_in(Arc::new(MemoryService::default()));

    assert_eq!(commands::home(&state).await.greeting, None);
    assert!(commands::save_profile(&state, "  ".to_string(), None).await.is_err());

    commands::save_profile(&state, "Asha".to_string(), Some(String::new()))
        .await
        .unwrap();
    assert_eq!(
        commands::profile_gate(&state).await,
        ProfileGate::Ready(UserProfile {
            name: "Asha".to_string(),
            email: None,
        })
    );
    assert_eq!(
        commands::home(&state).await.greeting.as_deref(),
        Some("Welcome back, Asha!")
    );
}

#[tokio::test]
async fn empty_tip_collection_shows_fallback() {
    let state = signed_in(Arc::new(MemoryService::default()));
    let TipsView::Tips(tips) = commands::tips(&state).await else {
        panic!("tips should be loaded");
    };
    assert_eq!(tips.len(), 4);
}

#[tokio::test]
async fn full_test_flow_lands_on_the_result_screen() {
    let service = Arc::new(MemoryService::default());
    let state = signed_in(service.clone());

    assert_eq!(commands::report(&state).await, ReportView::Empty);
    commands::navigate(&state, Screen::Test).await.unwrap();

    let err = commands::next_step(&state).await.unwrap_err();
    assert_eq!(err, "Please fill in all fields");

    commands::set_name(&state, "Asha".to_string()).await.unwrap();
    commands::set_age(&state, "34".to_string()).await.unwrap();
    assert_eq!(commands::next_step(&state).await, Ok(Step::Lifestyle));
    commands::set_flag(&state, RiskFactor::Smoking, true)
        .await
        .unwrap();
    assert_eq!(commands::next_step(&state).await, Ok(Step::Symptoms));
    assert_eq!(commands::next_step(&state).await, Ok(Step::Attachment));
    assert_eq!(commands::wizard_view(&state).await.unwrap().progress_percent, 100);

    let report = commands::submit(&state).await.unwrap();
    assert_eq!(report.badge, "HIGH RISK");
    assert_eq!(report.risk_factor_summary(), "Smoking");
    assert_eq!(commands::current_screen(&state).await, Screen::Result);
    assert!(commands::wizard_view(&state).await.is_err());

    assert!(matches!(
        commands::report(&state).await,
        ReportView::Report(r) if r.badge == "HIGH RISK"
    ));
    assert_eq!(service.received.lock().unwrap()[0].age, 34);
}

#[tokio::test]
async fn submitting_before_the_last_step_sends_nothing() {
    let service = Arc::new(MemoryService::default());
    let state = signed_in(service.clone());

    commands::navigate(&state, Screen::Test).await.unwrap();
    commands::set_name(&state, "Asha".to_string()).await.unwrap();
    commands::set_age(&state, "34".to_string()).await.unwrap();

    let err = commands::submit(&state).await.unwrap_err();
    assert_eq!(err, "Please complete all steps before submitting");
    assert_eq!(commands::next_step(&state).await, Ok(Step::Lifestyle));
    assert!(commands::submit(&state).await.is_err());

    assert!(service.received.lock().unwrap().is_empty());
    assert_eq!(commands::current_screen(&state).await, Screen::Test);
    let view = commands::wizard_view(&state).await.unwrap();
    assert_eq!(view.step, Step::Lifestyle);
    assert_eq!(view.draft.name, "Asha");
}

#[tokio::test]
async fn leaving_the_test_discards_the_draft() {
    let state = signed_in(Arc::new(MemoryService::default()));

    commands::navigate(&state, Screen::Test).await.unwrap();
    commands::set_name(&state, "Asha".to_string()).await.unwrap();
    commands::navigate(&state, Screen::Tips).await.unwrap();
    commands::navigate(&state, Screen::Test).await.unwrap();

    let view = commands::wizard_view(&state).await.unwrap();
    assert_eq!(view.step, Step::Identity);
    assert!(view.draft.name.is_empty());
}

#[tokio::test]
async fn anonymous_users_cannot_open_the_test() {
    let (publisher, handle) = ActorHandle::channel();
    publisher.resolve(Actor::new(Arc::new(MemoryService::default()), false));
    let state = AppState::new(config(), publisher, handle);

    assert!(commands::navigate(&state, Screen::Reports).await.is_err());
    assert_eq!(commands::navigate(&state, Screen::Tips).await, Ok(Screen::Tips));
    assert_eq!(commands::profile_gate(&state).await, ProfileGate::Anonymous);
    let cards = commands::home(&state).await.cards;
    assert!(!cards[0].enabled);
}

#[tokio::test]
async fn config_info_is_redacted() {
    let (publisher, handle) = ActorHandle::channel();
    let state = AppState::new(
        EarlyCareConfig::new(
            "http://127.0.0.1:9",
            Identity::Token {
                token: "tok_1234567890abcd".to_string(),
            },
        ),
        publisher,
        handle,
    );
    let info = commands::config_info(&state).await;
    assert_eq!(info.token_hint.as_deref(), Some("tok_...abcd"));
}
