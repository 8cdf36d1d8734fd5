//! The actor handle: a gateway plus the caller's sign-in state.
//!
//! The identity provider resolves asynchronously at startup. Until it does,
//! the handle reports [`ActorStatus::Resolving`], which consumers must treat
//! as "loading" rather than "signed out".

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use crate::gateway::Gateway;

/// A resolved gateway for the current caller.
#[derive(Clone)]
pub struct Actor {
    gateway: Arc<dyn Gateway>,
    authenticated: bool,
}

impl Actor {
    pub fn new(gateway: Arc<dyn Gateway>, authenticated: bool) -> Self {
        Self {
            gateway,
            authenticated,
        }
    }

    pub fn gateway(&self) -> Arc<dyn Gateway> {
        Arc::clone(&self.gateway)
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}

impl fmt::Debug for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actor")
            .field("authenticated", &self.authenticated)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default)]
pub enum ActorStatus {
    #[default]
    Resolving,
    Ready(Actor),
}

/// Write side, held by whatever drives sign-in.
#[derive(Debug)]
pub struct ActorPublisher {
    tx: watch::Sender<ActorStatus>,
}

impl ActorPublisher {
    pub fn resolve(&self, actor: Actor) {
        tracing::info!(authenticated = actor.is_authenticated(), "actor resolved");
        self.tx.send_replace(ActorStatus::Ready(actor));
    }

    /// Drop back to resolving, e.g. while switching identities.
    pub fn reset(&self) {
        self.tx.send_replace(ActorStatus::Resolving);
    }
}

/// Read side, cloned into every consumer.
#[derive(Debug, Clone)]
pub struct ActorHandle {
    rx: watch::Receiver<ActorStatus>,
}

impl ActorHandle {
    /// A new, unresolved handle and its publisher.
    pub fn channel() -> (ActorPublisher, ActorHandle) {
        let (tx, rx) = watch::channel(ActorStatus::Resolving);
        (ActorPublisher { tx }, ActorHandle { rx })
    }

    /// A handle that is already resolved to `actor`.
    pub fn resolved(actor: Actor) -> ActorHandle {
        let (_tx, rx) = watch::channel(ActorStatus::Ready(actor));
        ActorHandle { rx }
    }

    pub fn status(&self) -> ActorStatus {
        self.rx.borrow().clone()
    }

    /// The actor, if resolved.
    pub fn current(&self) -> Option<Actor> {
        match &*self.rx.borrow() {
            ActorStatus::Ready(actor) => Some(actor.clone()),
            ActorStatus::Resolving => None,
        }
    }

    /// `false` both while resolving and when resolved anonymously.
    pub fn is_authenticated(&self) -> bool {
        self.current().is_some_and(|a| a.is_authenticated())
    }

    /// Wait until the actor is resolved. Returns `None` if the publisher was
    /// dropped before resolving.
    pub async fn ready(&self) -> Option<Actor> {
        let mut rx = self.rx.clone();
        let status = rx
            .wait_for(|s| matches!(s, ActorStatus::Ready(_)))
            .await
            .ok()?;
        match &*status {
            ActorStatus::Ready(actor) => Some(actor.clone()),
            ActorStatus::Resolving => None,
        }
    }
}
