//! Token authentication middleware.
//!
//! Adds `Authorization: Bearer <token>` to every outgoing request that does
//! not carry one already. GitHub accepts personal access tokens and app
//! installation tokens this way.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tower::{Layer, Service};

use crate::{Error, Request, Response, Result};

/// Layer that adds bearer token authentication to requests.
#[derive(Clone)]
pub struct BearerAuthLayer {
    header: Arc<str>,
}

impl std::fmt::Debug for BearerAuthLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerAuthLayer").finish_non_exhaustive()
    }
}

impl BearerAuthLayer {
    /// Create a new bearer auth layer with the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            header: Arc::from(format!("Bearer {}", token.into())),
        }
    }
}

impl<S> Layer<S> for BearerAuthLayer {
    type Service = BearerAuth<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BearerAuth {
            inner,
            header: Arc::clone(&self.header),
        }
    }
}

/// Service that adds bearer token authentication to requests.
#[derive(Clone)]
pub struct BearerAuth<S> {
    inner: S,
    header: Arc<str>,
}

impl<S> Service<Request> for BearerAuth<S>
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
    fn bearer_header_value() {
        let layer = BearerAuthLayer::new("ghp_abc");
        assert_eq!(&*layer.header, "Bearer ghp_abc");
    }

    #[test]
    fn debug_hides_token() {
        let layer = BearerAuthLayer::new("ghp_abc");
        assert!(!format!("{layer:?}").contains("ghp_abc"));
    }
}
