//! Core types and traits for the hubrest GitHub REST client.
//!
//! This crate holds the transport-independent pieces:
//! - [`Params`] - `name=value` encoding as a JSON body or a query string
//! - [`parse_response`] - raw HTTP response parsing with `100 Continue` skipping
//! - [`normalize()`] - derived `Link_<rel>` entries, `ETag` unwrapping and [`RateLimit`]
//! - [`Request`], [`RequestBuilder`] and [`Response`] - HTTP message types
//! - [`Headers`] - insertion-ordered, case-preserving header map
//! - [`Body`] - streaming body
//! - [`Error`] and [`Result`] - Error handling
//! - [`HttpClient`] - Core client trait for HTTP execution

mod body;
mod client;
mod error;
mod headers;
mod method;
mod normalize;
mod params;
mod parser;
pub mod prelude;
mod request;
mod response;

pub use body::{Body, BodyStream, ContentType};
pub use client::HttpClient;
pub use error::{Error, Result};
pub use headers::Headers;
pub use method::Method;
pub use normalize::{LINK_PREFIX, Normalized, RateLimit, normalize, parse_link_header, unquote};
pub use params::{Param, Params, RESERVED_PREFIX, ValueKind};
pub use parser::{StatusLine, parse_response};
pub use request::{Request, RequestBuilder, quote_etag, resolve_url};
pub use response::{Head, Response};
