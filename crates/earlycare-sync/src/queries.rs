//! Typed reads and writes for each remote resource.
//!
//! Every read is gated on the actor: until the identity provider has
//! resolved a gateway, reads report [`QueryState::Loading`] and never touch
//! the cache, so the UI cannot mistake "not ready" for "loaded, empty".

use std::sync::Arc;

use earlycare_core::models::profile::UserProfile;
use earlycare_core::models::result::TestResult;
use earlycare_core::models::submission::FinalizedSubmission;
use earlycare_core::models::tip::HealthTip;
use earlycare_gateway::{Actor, ActorHandle};

use crate::cache::QueryCache;
use crate::error::QueryError;
use crate::keys::{MutationKey, QueryKey};
use crate::state::QueryState;

#[derive(Clone)]
pub struct Queries {
    cache: Arc<QueryCache>,
    actor: ActorHandle,
}

impl Queries {
    pub fn new(cache: Arc<QueryCache>, actor: ActorHandle) -> Self {
        Self { cache, actor }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn actor(&self) -> &ActorHandle {
        &self.actor
    }

    pub async fn caller_user_profile(&self) -> QueryState<Option<UserProfile>> {
        let Some(actor) = self.actor.current() else {
            return QueryState::Loading;
        };
        let gateway = actor.gateway();
        self.cache
            .read(QueryKey::CurrentUserProfile, move || async move {
                gateway.get_caller_user_profile().await
            })
            .await
            .into()
    }

    pub async fn my_latest_result(&self) -> QueryState<Option<TestResult>> {
        let Some(actor) = self.actor.current() else {
            return QueryState::Loading;
        };
        let gateway = actor.gateway();
        self.cache
            .read(QueryKey::MyLatestResult, move || async move {
                gateway.get_my_results().await
            })
            .await
            .into()
    }

    /// Unlike the other reads, an unresolved actor leaves tips `Unloaded`:
    /// nothing is being fetched, and the screen falls back to built-in tips.
    pub async fn health_tips(&self) -> QueryState<Vec<HealthTip>> {
        let Some(actor) = self.actor.current() else {
            return QueryState::Unloaded;
        };
        let gateway = actor.gateway();
        self.cache
            .read(QueryKey::HealthTips, move || async move {
                gateway.get_all_health_tips().await
            })
            .await
            .into()
    }

    /// Force a fresh read of the latest result, e.g. from a retry button
    /// after a failed load.
    pub async fn refetch_my_latest_result(&self) -> QueryState<Option<TestResult>> {
        let Some(actor) = self.actor.current() else {
            return QueryState::Loading;
        };
        let gateway = actor.gateway();
        self.cache
            .refetch(QueryKey::MyLatestResult, move || async move {
                gateway.get_my_results().await
            })
            .await
            .into()
    }

    pub async fn save_caller_user_profile(&self, profile: UserProfile) -> Result<(), QueryError> {
        let gateway = self.require_actor()?.gateway();
        self.cache
            .write(MutationKey::SaveProfile, move || async move {
                gateway.save_caller_user_profile(profile).await
            })
            .await
    }

    pub async fn submit_test(
        &self,
        submission: FinalizedSubmission,
    ) -> Result<TestResult, QueryError> {
        let gateway = self.require_actor()?.gateway();
        self.cache
            .write(MutationKey::SubmitTest, move || async move {
                gateway.submit_test(submission).await
            })
            .await
    }

    fn require_actor(&self) -> Result<Actor, QueryError> {
        self.actor.current().ok_or(QueryError::ActorUnavailable)
    }
}
