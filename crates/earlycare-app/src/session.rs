//! Turning a config into a live actor.

use std::sync::Arc;

use tracing::info;

use earlycare_gateway::{Actor, ActorPublisher, HttpGateway};

use crate::config::EarlyCareConfig;

/// Build the HTTP gateway described by `config`.
pub fn build_gateway(config: &EarlyCareConfig) -> HttpGateway {
    let url = config.effective_service_url();
    let gateway = HttpGateway::new(
        &url,
        config.token().map(str::to_string),
        config.request_timeout(),
    );
    info!(
        service_url = %url,
        authenticated = gateway.is_authenticated(),
        timeout_secs = config.request_timeout_secs,
        "gateway configured"
    );
    gateway
}

/// Resolve the actor for `config` and publish it to every handle.
pub fn connect(config: &EarlyCareConfig, publisher: &ActorPublisher) {
    let gateway = build_gateway(config);
    let authenticated = gateway.is_authenticated();
    publisher.resolve(Actor::new(Arc::new(gateway), authenticated));
}
