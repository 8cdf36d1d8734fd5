//! JSON-over-HTTP gateway.
//!
//! `ureq` is blocking, so every call runs on tokio's blocking pool and the
//! async caller just awaits the join handle.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use earlycare_core::models::profile::UserProfile;
use earlycare_core::models::result::TestResult;
use earlycare_core::models::submission::FinalizedSubmission;
use earlycare_core::models::tip::HealthTip;

use crate::error::GatewayError;
use crate::gateway::{BoxFuture, Gateway};

/// Service routes, relative to the base URL.
pub mod route {
    pub const PROFILE: &str = "/profile";
    pub const LATEST_RESULT: &str = "/results/latest";
    pub const TESTS: &str = "/tests";
    pub const TIPS: &str = "/tips";
}

#[derive(Clone, Copy)]
enum Method {
    Put,
    Post,
}

pub struct HttpGateway {
    agent: ureq::Agent,
    base_url: String,
    bearer: Option<String>,
}

impl HttpGateway {
    /// Build a gateway for `base_url`. A `token` makes every request carry
    /// `Authorization: Bearer <token>`; without one the caller is anonymous.
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();

        Self {
            agent: ureq::Agent::new_with_config(config),
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer: token.map(|t| format!("Bearer {t}")),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer.is_some()
    }

    fn url(&self, route: &str) -> String {
        format!("{}{route}", self.base_url)
    }

    async fn get_json<T>(&self, route: &'static str) -> Result<T, GatewayError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let agent = self.agent.clone();
        let url = self.url(route);
        let bearer = self.bearer.clone();

        run_blocking(move || {
            debug!(url = %url, "GET");
            let mut req = agent.get(&url);
            if let Some(bearer) = &bearer {
                req = req.header("Authorization", bearer.as_str());
            }
            let mut resp = req.call().map_err(map_ureq_error)?;
            let body = resp.body_mut().read_to_string().map_err(map_ureq_error)?;
            Ok(serde_json::from_str(&body)?)
        })
        .await
    }

    async fn send_json<B, T>(
        &self,
        method: Method,
        route: &'static str,
        body: &B,
    ) -> Result<T, GatewayError>
    where
        B: Serialize,
        T: DeserializeOwned + Send + 'static,
    {
        let payload = serde_json::to_vec(body)?;
        let agent = self.agent.clone();
        let url = self.url(route);
        let bearer = self.bearer.clone();

        run_blocking(move || {
            let mut req = match method {
                Method::Put => agent.put(&url),
                Method::Post => agent.post(&url),
            };
            debug!(url = %url, bytes = payload.len(), "sending");
            req = req.header("Content-Type", "application/json");
            if let Some(bearer) = &bearer {
                req = req.header("Authorization", bearer.as_str());
            }
            let mut resp = req.send(payload.as_slice()).map_err(map_ureq_error)?;
            let text = resp.body_mut().read_to_string().map_err(map_ureq_error)?;
            // Unit-returning routes answer with an empty body.
            let text = if text.trim().is_empty() { "null" } else { text.as_str() };
            Ok(serde_json::from_str(text)?)
        })
        .await
    }
}

impl Gateway for HttpGateway {
    fn get_caller_user_profile(
        &self,
    ) -> BoxFuture<'_, Result<Option<UserProfile>, GatewayError>> {
        Box::pin(async move { absent_on_not_found(self.get_json(route::PROFILE).await) })
    }

    fn save_caller_user_profile(
        &self,
        profile: UserProfile,
    ) -> BoxFuture<'_, Result<(), GatewayError>> {
        Box::pin(async move { self.send_json(Method::Put, route::PROFILE, &profile).await })
    }

    fn get_my_results(&self) -> BoxFuture<'_, Result<Option<TestResult>, GatewayError>> {
        Box::pin(async move { absent_on_not_found(self.get_json(route::LATEST_RESULT).await) })
    }

    fn submit_test(
        &self,
        submission: FinalizedSubmission,
    ) -> BoxFuture<'_, Result<TestResult, GatewayError>> {
        Box::pin(async move { self.send_json(Method::Post, route::TESTS, &submission).await })
    }

    fn get_all_health_tips(&self) -> BoxFuture<'_, Result<Vec<HealthTip>, GatewayError>> {
        Box::pin(async move { self.get_json(route::TIPS).await })
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T, GatewayError>
where
    F: FnOnce() -> Result<T, GatewayError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| GatewayError::Task(e.to_string()))?
}

/// The optional reads answer 404 when the record does not exist.
fn absent_on_not_found<T>(res: Result<Option<T>, GatewayError>) -> Result<Option<T>, GatewayError> {
    match res {
        Err(GatewayError::NotFound) => Ok(None),
        other => other,
    }
}

fn map_ureq_error(err: ureq::Error) -> GatewayError {
    match err {
        ureq::Error::StatusCode(401 | 403) => GatewayError::Unauthorized,
        ureq::Error::StatusCode(404) => GatewayError::NotFound,
        ureq::Error::StatusCode(code) => GatewayError::Status(code),
        other => GatewayError::Transport(other.to_string()),
    }
}
