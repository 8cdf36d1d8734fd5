//! View models for each screen, derived from query state.
//!
//! Nothing here talks to the service; every type is built from what the
//! query layer reports, so each view can be tested from plain values.

use serde::Serialize;

use earlycare_core::models::profile::UserProfile;
use earlycare_core::models::result::TestResult;
use earlycare_core::models::submission::RiskFactor;
use earlycare_core::models::tip::{HealthTip, fallback_tips};
use earlycare_sync::{QueryError, QueryState};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Splash,
    Home,
    Test,
    Result,
    Tips,
    Emergency,
    Reports,
}

impl Screen {
    pub fn shows_bottom_nav(self) -> bool {
        !matches!(self, Screen::Splash | Screen::Result)
    }

    pub fn requires_auth(self) -> bool {
        matches!(self, Screen::Test | Screen::Reports)
    }

    pub fn parse(s: &str) -> Option<Screen> {
        match s.to_ascii_lowercase().as_str() {
            "splash" => Some(Screen::Splash),
            "home" => Some(Screen::Home),
            "test" => Some(Screen::Test),
            "result" => Some(Screen::Result),
            "tips" => Some(Screen::Tips),
            "emergency" => Some(Screen::Emergency),
            "reports" => Some(Screen::Reports),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeCard {
    pub title: &'static str,
    pub target: Screen,
    pub enabled: bool,
}

pub fn home_cards(authenticated: bool) -> Vec<HomeCard> {
    [
        ("Check My Health", Screen::Test),
        ("My Reports", Screen::Reports),
        ("Health Tips", Screen::Tips),
        ("Emergency Help", Screen::Emergency),
    ]
    .into_iter()
    .map(|(title, target)| HomeCard {
        title,
        target,
        enabled: authenticated || !target.requires_auth(),
    })
    .collect()
}

/// Whether the signed-in user still needs to create a profile.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileGate {
    Loading,
    Anonymous,
    SetupRequired,
    Ready(UserProfile),
    Unavailable(QueryError),
}

impl ProfileGate {
    /// `authenticated` is `None` while the actor is still resolving.
    pub fn from_state(authenticated: Option<bool>, state: QueryState<Option<UserProfile>>) -> Self {
        match authenticated {
            None => ProfileGate::Loading,
            Some(false) => ProfileGate::Anonymous,
            Some(true) => match state {
                QueryState::Unloaded | QueryState::Loading => ProfileGate::Loading,
                QueryState::Loaded(None) => ProfileGate::SetupRequired,
                QueryState::Loaded(Some(profile)) => ProfileGate::Ready(profile),
                QueryState::Errored(e) => ProfileGate::Unavailable(e),
            },
        }
    }

    pub fn greeting(&self) -> Option<String> {
        match self {
            ProfileGate::Ready(profile) => Some(format!("Welcome back, {}!", profile.name)),
            _ => None,
        }
    }
}

pub const TIP_PLACEHOLDERS: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub enum TipsView {
    Loading { placeholders: usize },
    Tips(Vec<HealthTip>),
}

impl TipsView {
    /// Placeholders only while a fetch is in flight. A collection that is
    /// not loaded, empty or failed shows the built-in tips, never an empty
    /// list.
    pub fn from_state(state: QueryState<Vec<HealthTip>>) -> Self {
        match state {
            QueryState::Loading => TipsView::Loading {
                placeholders: TIP_PLACEHOLDERS,
            },
            QueryState::Loaded(tips) if !tips.is_empty() => TipsView::Tips(tips),
            QueryState::Unloaded | QueryState::Loaded(_) | QueryState::Errored(_) => {
                TipsView::Tips(fallback_tips())
            }
        }
    }
}

pub const NO_REPORT_MESSAGE: &str = "Take your first health assessment to see your results here.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub badge: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub risk_factors: Vec<&'static str>,
    pub advice: String,
    pub submitted_at: String,
}

impl Report {
    pub fn from_result(result: &TestResult) -> Self {
        let submission = &result.submission;
        Self {
            badge: result.risk_level.badge(),
            name: submission.name.clone(),
            age: submission.age,
            gender: submission.gender.label().to_string(),
            risk_factors: submission
                .risk_factors()
                .into_iter()
                .map(RiskFactor::label)
                .collect(),
            advice: result.advice.clone(),
            submitted_at: result.timestamp.strftime("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }

    pub fn risk_factor_summary(&self) -> String {
        if self.risk_factors.is_empty() {
            "No risk factors".to_string()
        } else {
            self.risk_factors.join(", ")
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportView {
    Loading,
    Empty,
    Report(Report),
    Unavailable(QueryError),
}

impl ReportView {
    pub fn from_state(state: QueryState<Option<TestResult>>) -> Self {
        match state {
            QueryState::Unloaded | QueryState::Loading => ReportView::Loading,
            QueryState::Loaded(None) => ReportView::Empty,
            QueryState::Loaded(Some(result)) => ReportView::Report(Report::from_result(&result)),
            QueryState::Errored(e) => ReportView::Unavailable(e),
        }
    }
}
