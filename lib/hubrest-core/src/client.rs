//! HTTP client trait.
//!
//! [`HttpClient`] is the seam between request orchestration and the
//! transport. The `hubrest` crate implements it over hyper; tests implement it
//! over canned raw responses run through [`crate::parse_response`].

use std::future::Future;

use crate::{Request, Response, Result};

/// Core HTTP client trait.
///
/// Implementations send one request and return the raw, un-normalized
/// response. They never retry.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason:
    /// - Network errors
    /// - TLS errors
    /// - Invalid response
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;
}

impl<C: HttpClient> HttpClient for &C {
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
        (**self).execute(request)
    }
}

impl<C: HttpClient> HttpClient for std::sync::Arc<C> {
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
        (**self).execute(request)
    }
}
