//! Tower middleware layers for the hubrest HTTP client.
//!
//! Layers wrap the hyper transport through
//! [`HyperClientBuilder::layer`](crate::HyperClientBuilder::layer) or the
//! feature-gated helpers.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `middleware-logging` | `.with_logging()` helper |
//! | `middleware-bearer-auth` | `.with_bearer_auth()` helper |
//! | `middleware-basic-auth` | `.with_basic_auth()` helper |
//!
//! # Available Layers
//!
//! - [`BearerAuthLayer`] - Adds `Authorization: Bearer <token>` header
//! - [`BasicAuthLayer`] - Adds `Authorization: Basic <base64>` header
//! - [`LoggingLayer`] - Logs requests/responses using `tracing`
//!
//! No retry layer is provided; failed requests are reported as they are.

#[cfg(feature = "middleware-basic-auth")]
mod basic_auth;
mod bearer_auth;
mod logging;

#[cfg(feature = "middleware-basic-auth")]
pub use basic_auth::{BasicAuth, BasicAuthLayer};
pub use bearer_auth::{BearerAuth, BearerAuthLayer};
pub use logging::{LogLevel, Logging, LoggingLayer};

pub use tower::{Layer, ServiceBuilder};
