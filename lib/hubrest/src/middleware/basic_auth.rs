//! Basic authentication middleware.
//!
//! Adds `Authorization: Basic <base64(login:password)>` to every outgoing
//! request, for credentials found in a netrc file.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use base64::Engine;
use tower::{Layer, Service};

use crate::{Error, Request, Response, Result};

/// Layer that adds basic authentication to requests.
#[derive(Clone)]
pub struct BasicAuthLayer {
    /// `Basic <base64(login:password)>`.
    header: Arc<str>,
}

impl std::fmt::Debug for BasicAuthLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuthLayer").finish_non_exhaustive()
    }
}

impl BasicAuthLayer {
    /// Create a new basic auth layer with the given login and password.
    pub fn new(login: impl AsRef<str>, password: impl AsRef<str>) -> Self {
        let credentials = format!("{}:{}", login.as_ref(), password.as_ref());
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
        Self {
            header: Arc::from(format!("Basic {encoded}")),
        }
    }
}

impl<S> Layer<S> for BasicAuthLayer {
    type Service = BasicAuth<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BasicAuth {
            inner,
            header: Arc::clone(&self.header),
        }
    }
}

/// Service that adds basic authentication to requests.
#[derive(Clone)]
pub struct BasicAuth<S> {
    inner: S,
    header: Arc<str>,
}

impl<S> Service<Request> for BasicAuth<S>
where
    S: Service<Request, Response = Response, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request) -> Self::Future {
        // An explicit header set by the caller wins
        if request.headers().get_ignore_case("Authorization").is_none() {
            request
                .headers_mut()
                .insert("Authorization", self.header.as_ref());
        }

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(request).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_auth_encodes_correctly() {
        // "user:pass" -> "dXNlcjpwYXNz"
        let layer = BasicAuthLayer::new("user", "pass");
        assert_eq!(&*layer.header, "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn debug_hides_credentials() {
        let layer = BasicAuthLayer::new("user", "pass");
        assert!(!format!("{layer:?}").contains("dXNlcjpwYXNz"));
    }
}
