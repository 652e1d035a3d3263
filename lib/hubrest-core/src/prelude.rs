//! Prelude module for convenient imports.
//!
//! ```
//! use hubrest_core::prelude::*;
//! ```

pub use crate::{
    Body, ContentType, Error, Headers, HttpClient, Method, Params, RateLimit, Request,
    RequestBuilder, Response, Result,
};
