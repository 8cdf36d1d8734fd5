//! Wires the scripted gateway into a ready [`Queries`].

use std::sync::Arc;

use earlycare_gateway::testing::ScriptedGateway;
use earlycare_gateway::{Actor, ActorHandle};
use earlycare_sync::{Queries, QueryCache};

pub use earlycare_gateway::testing::{result_with, submission};

pub fn queries_for(gateway: Arc<ScriptedGateway>, authenticated: bool) -> Queries {
    let actor = ActorHandle::resolved(Actor::new(gateway, authenticated));
    Queries::new(Arc::new(QueryCache::new()), actor)
}
