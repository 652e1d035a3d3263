//! GitHub v3 REST client.
//!
//! [`ApiClient`] sends requests against a configured API root through a
//! tower-based [`HyperClient`], normalizes the response headers, and offers
//! one wrapper per HTTP verb:
//!
//! - [`ApiClient::get`] returns lazy [`Pages`] that follow `Link: rel="next"`
//! - [`ApiClient::post`], [`ApiClient::put`], [`ApiClient::patch`] send a [`Payload`]
//! - [`ApiClient::delete`] succeeds only on `204 No Content`
//!
//! # Example
//!
//! ```no_run
//! use hubrest::prelude::*;
//!
//! # async fn run() -> hubrest::Result<()> {
//! let config = ClientConfig::default();
//! let http = HyperClient::builder()
//!     .config(config.clone())
//!     .with_logging()
//!     .with_bearer_auth("ghp_secret")
//!     .build();
//! let client = ApiClient::new(http, &config)?;
//!
//! let ctx = CallContext::new();
//! let query = Params::parse(["per_page=100"])?;
//! let mut pages = client
//!     .get(ApiRequest::new("/user/repos").query(&query), Follow::Unlimited, &ctx)
//!     .await?;
//! while let Some(page) = pages.next_page().await? {
//!     let body = page.bytes().await?;
//!     println!("{}", String::from_utf8_lossy(&body));
//! }
//! # Ok(())
//! # }
//! ```

mod api_client;
mod client;
mod config;
mod connector;
pub mod middleware;
mod pagination;
pub mod prelude;
mod verbs;

pub use api_client::{ApiClient, ApiRequest, CallContext, Payload};
pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{
    ClientConfig, ClientConfigBuilder, DEFAULT_ACCEPT, DEFAULT_BASE_URL, DEFAULT_USER_AGENT,
};
pub use pagination::{Follow, Pages};

// Re-export tower for middleware composition
pub use tower;

pub use hubrest_core::{
    Body, BodyStream, ContentType, Error, Head, Headers, HttpClient, LINK_PREFIX, Method,
    Normalized, Param, Params, RESERVED_PREFIX, RateLimit, Request, RequestBuilder, Response,
    Result, StatusLine, ValueKind, normalize, parse_link_header, parse_response, quote_etag,
    resolve_url, unquote,
};

pub use tokio_util::sync::CancellationToken;
pub use url;
