use std::sync::Arc;

use tokio::sync::Mutex;

use earlycare_gateway::{ActorHandle, ActorPublisher};
use earlycare_intake::{SubmissionOrchestrator, Wizard};
use earlycare_sync::{Queries, QueryCache};

use crate::config::EarlyCareConfig;
use crate::session;
use crate::views::Screen;

pub struct AppState {
    pub config: Mutex<EarlyCareConfig>,
    pub publisher: ActorPublisher,
    pub queries: Queries,
    pub orchestrator: SubmissionOrchestrator,
    pub screen: Mutex<Screen>,
    /// The test in progress, if any. Dropped when the user leaves the test
    /// screen or a submission succeeds.
    pub wizard: Mutex<Option<Wizard>>,
}

impl AppState {
    /// State around an existing actor channel. The actor stays unresolved
    /// until someone publishes one.
    pub fn new(config: EarlyCareConfig, publisher: ActorPublisher, actor: ActorHandle) -> Self {
        let queries = Queries::new(Arc::new(QueryCache::new()), actor);
        Self {
            config: Mutex::new(config),
            publisher,
            orchestrator: SubmissionOrchestrator::new(queries.clone()),
            queries,
            screen: Mutex::new(Screen::default()),
            wizard: Mutex::new(None),
        }
    }

    /// State with the HTTP gateway from `config` already resolved.
    pub fn connect(config: EarlyCareConfig) -> Self {
        let (publisher, actor) = ActorHandle::channel();
        session::connect(&config, &publisher);
        Self::new(config, publisher, actor)
    }
}
