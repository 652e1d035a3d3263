//! Prelude module for convenient imports.
//!
//! ```
//! use hubrest::prelude::*;
//! ```

pub use crate::{
    ApiClient, ApiRequest, CallContext, ClientConfig, Error, Follow, Headers, HttpClient,
    HyperClient, Method, Pages, Params, Payload, RateLimit, Response, Result,
};
