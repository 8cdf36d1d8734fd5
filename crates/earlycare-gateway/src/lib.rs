//! earlycare-gateway
//!
//! The boundary to the remote EarlyCare service: the [`Gateway`] trait, its
//! HTTP implementation, and the actor handle that tells the rest of the
//! client whether a gateway is available yet.

pub mod actor;
pub mod error;
pub mod gateway;
pub mod http;
#[cfg(feature = "test-util")]
pub mod testing;

pub use crate::actor::{Actor, ActorHandle, ActorPublisher, ActorStatus};
pub use crate::error::GatewayError;
pub use crate::gateway::{BoxFuture, Gateway};
pub use crate::http::HttpGateway;
