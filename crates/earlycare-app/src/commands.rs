//! The command layer. Every front end goes through these functions, and
//! every error leaves here as a user-presentable `String`.

use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use earlycare_core::models::profile::UserProfile;
use earlycare_core::models::submission::{Gender, RiskFactor};
use earlycare_intake::{Blocked, DraftSubmission, Notice, Step, Wizard};

use crate::config::{self, ConfigInfo, Identity};
use crate::session;
use crate::state::AppState;
use crate::views::{HomeCard, ProfileGate, Report, ReportView, Screen, TipsView, home_cards};

#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub greeting: Option<String>,
    pub cards: Vec<HomeCard>,
}

#[derive(Debug, Clone)]
pub struct WizardView {
    pub step: Step,
    pub title: &'static str,
    pub progress_percent: u8,
    pub is_last_step: bool,
    pub draft: DraftSubmission,
}

pub async fn current_screen(state: &AppState) -> Screen {
    *state.screen.lock().await
}

/// Move to `target`. Screens that need a signed-in user are refused while
/// anonymous or still resolving.
pub async fn navigate(state: &AppState, target: Screen) -> Result<Screen, String> {
    if target.requires_auth() && !state.queries.actor().is_authenticated() {
        return Err("Please sign in to continue".to_string());
    }

    let mut screen = state.screen.lock().await;
    let mut wizard = state.wizard.lock().await;
    if target == Screen::Test {
        if wizard.is_none() {
            *wizard = Some(Wizard::new());
        }
    } else if wizard.take().is_some() {
        info!("test abandoned, draft discarded");
    }
    *screen = target;
    Ok(target)
}

pub async fn home(state: &AppState) -> HomeView {
    let gate = profile_gate(state).await;
    HomeView {
        greeting: gate.greeting(),
        cards: home_cards(state.queries.actor().is_authenticated()),
    }
}

pub async fn profile_gate(state: &AppState) -> ProfileGate {
    let authenticated = state
        .queries
        .actor()
        .current()
        .map(|actor| actor.is_authenticated());
    if authenticated != Some(true) {
        return ProfileGate::from_state(authenticated, earlycare_sync::QueryState::Loading);
    }
    let profile = state.queries.caller_user_profile().await;
    ProfileGate::from_state(authenticated, profile)
}

pub async fn save_profile(
    state: &AppState,
    name: String,
    email: Option<String>,
) -> Result<(), String> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err("Please enter your name".to_string());
    }
    let email = email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty());

    state
        .queries
        .save_caller_user_profile(UserProfile { name, email })
        .await
        .map_err(|e| e.to_string())
}

pub async fn tips(state: &AppState) -> TipsView {
    TipsView::from_state(state.queries.health_tips().await)
}

pub async fn report(state: &AppState) -> ReportView {
    ReportView::from_state(state.queries.my_latest_result().await)
}

pub async fn retry_report(state: &AppState) -> ReportView {
    ReportView::from_state(state.queries.refetch_my_latest_result().await)
}

pub async fn wizard_view(state: &AppState) -> Result<WizardView, String> {
    let wizard = state.wizard.lock().await;
    let wizard = wizard.as_ref().ok_or_else(no_test)?;
    Ok(WizardView {
        step: wizard.step(),
        title: wizard.step().title(),
        progress_percent: wizard.step().progress_percent(),
        is_last_step: wizard.is_last_step(),
        draft: wizard.draft().clone(),
    })
}

pub async fn set_name(state: &AppState, name: String) -> Result<(), String> {
    with_wizard(state, |w| w.set_name(name)).await
}

pub async fn set_age(state: &AppState, age: String) -> Result<(), String> {
    with_wizard(state, |w| w.set_age(age)).await
}

pub async fn set_gender(state: &AppState, gender: Gender) -> Result<(), String> {
    with_wizard(state, |w| w.set_gender(gender)).await
}

pub async fn set_flag(state: &AppState, factor: RiskFactor, value: bool) -> Result<(), String> {
    with_wizard(state, |w| w.set_flag(factor, value)).await
}

/// Advance the wizard. A refusal comes back as the notice to show.
pub async fn next_step(state: &AppState) -> Result<Step, String> {
    let mut slot = state.wizard.lock().await;
    let wizard = slot.take().ok_or_else(no_test)?;
    match wizard.advance() {
        Ok(wizard) => {
            let step = wizard.step();
            *slot = Some(wizard);
            Ok(step)
        }
        Err(Blocked { wizard, reason }) => {
            *slot = Some(wizard);
            Err(Notice::from(&reason).to_string())
        }
    }
}

pub async fn previous_step(state: &AppState) -> Result<Step, String> {
    let mut slot = state.wizard.lock().await;
    let wizard = slot.take().ok_or_else(no_test)?.retreat();
    let step = wizard.step();
    *slot = Some(wizard);
    Ok(step)
}

pub async fn attach(state: &AppState, path: &Path) -> Result<Notice, String> {
    let mut slot = state.wizard.lock().await;
    let wizard = slot.as_mut().ok_or_else(no_test)?;
    match wizard.attach_file(path).await {
        Ok(size) => {
            info!(path = %path.display(), size, "attachment selected");
            Ok(Notice::ImageAccepted)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "attachment refused");
            Err(Notice::from(&e).to_string())
        }
    }
}

pub async fn detach(state: &AppState) -> Result<(), String> {
    with_wizard(state, Wizard::clear_attachment).await
}

/// Submit the test in progress. On success the draft is dropped and the
/// result screen shown; on failure the draft is kept for another try.
/// Nothing is sent before the wizard reaches its last step.
pub async fn submit(state: &AppState) -> Result<Report, String> {
    let draft = {
        let slot = state.wizard.lock().await;
        let wizard = slot.as_ref().ok_or_else(no_test)?;
        match wizard.submittable() {
            Ok(draft) => draft.clone(),
            Err(reason) => return Err(Notice::from(&reason).to_string()),
        }
    };

    match state.orchestrator.submit(&draft).await {
        Ok(result) => {
            *state.wizard.lock().await = None;
            *state.screen.lock().await = Screen::Result;
            Ok(Report::from_result(&result))
        }
        Err(e) => Err(Notice::from(&e).to_string()),
    }
}

pub async fn config_info(state: &AppState) -> ConfigInfo {
    config::config_info(&*state.config.lock().await)
}

/// Switch identity: drop everything cached for the old caller and resolve a
/// new actor. Persisting the change is up to the caller.
pub async fn set_identity(state: &AppState, identity: Identity) {
    state.publisher.reset();
    state.queries.cache().clear().await;
    *state.wizard.lock().await = None;

    let mut config = state.config.lock().await;
    config.identity = identity;
    session::connect(&config, &state.publisher);

    let mut screen = state.screen.lock().await;
    if screen.requires_auth() && !state.queries.actor().is_authenticated() {
        *screen = Screen::Home;
    }
}

fn no_test() -> String {
    "No test in progress".to_string()
}

async fn with_wizard(state: &AppState, f: impl FnOnce(&mut Wizard)) -> Result<(), String> {
    let mut slot = state.wizard.lock().await;
    let wizard = slot.as_mut().ok_or_else(no_test)?;
    f(wizard);
    Ok(())
}
