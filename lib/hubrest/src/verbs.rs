//! Verb wrappers.
//!
//! Each wrapper sends one request through [`ApiClient::execute`] and turns the
//! status code into success or a typed error:
//!
//! | Wrapper | Success | Failure |
//! |---------|---------|---------|
//! | [`ApiClient::get`] | below 400, then paginates | [`Error::Client`] / [`Error::Server`] |
//! | [`ApiClient::post`], [`ApiClient::put`], [`ApiClient::patch`] | below 400 | [`Error::Client`] / [`Error::Server`] |
//! | [`ApiClient::delete`] | exactly 204 | any other status |
//!
//! A failed status never hands out the body. Nothing is retried.

use tracing::debug;

use crate::{
    ApiClient, ApiRequest, CallContext, Error, Follow, HttpClient, Method, Pages, Response, Result,
};

/// Classify a GET/POST style response: 4xx and 5xx are errors.
pub(crate) fn check_status(response: Response) -> Result<Response> {
    if response.status() >= 400 {
        return Err(Error::from_response(&response));
    }
    Ok(response)
}

impl<C: HttpClient + Clone> ApiClient<C> {
    /// `GET` the first page, then follow `next` links as `follow` allows.
    ///
    /// # Errors
    ///
    /// Returns an error if the first page fails; later pages report their
    /// errors through [`Pages::next_page`].
    pub async fn get(
        &self,
        request: ApiRequest,
        follow: Follow,
        ctx: &CallContext,
    ) -> Result<Pages<C>> {
        let headers = request.headers.clone();
        let response = check_status(self.execute(request.method(Method::Get), ctx).await?)?;
        Ok(Pages::new(self.clone(), ctx.clone(), headers, response, follow))
    }
}

impl<C: HttpClient> ApiClient<C> {
    /// `POST` the request; never paginates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Client`] or [`Error::Server`] for a 4xx or 5xx status.
    pub async fn post(&self, request: ApiRequest, ctx: &CallContext) -> Result<Response> {
        self.send_checked(request.method(Method::Post), ctx).await
    }

    /// `PUT` the request; never paginates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Client`] or [`Error::Server`] for a 4xx or 5xx status.
    pub async fn put(&self, request: ApiRequest, ctx: &CallContext) -> Result<Response> {
        self.send_checked(request.method(Method::Put), ctx).await
    }

    /// `PATCH` the request; never paginates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Client`] or [`Error::Server`] for a 4xx or 5xx status.
    pub async fn patch(&self, request: ApiRequest, ctx: &CallContext) -> Result<Response> {
        self.send_checked(request.method(Method::Patch), ctx).await
    }

    /// `DELETE` the resource. Only `204 No Content` counts as success.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Client`], [`Error::Server`] or
    /// [`Error::UnexpectedStatus`] for any status but 204.
    pub async fn delete(&self, request: ApiRequest, ctx: &CallContext) -> Result<Response> {
        let response = self.execute(request.method(Method::Delete), ctx).await?;
        if response.status() != 204 {
            return Err(Error::from_response(&response));
        }
        Ok(response)
    }

    async fn send_checked(&self, request: ApiRequest, ctx: &CallContext) -> Result<Response> {
        let response = self.execute(request, ctx).await?;
        debug!(status = response.status(), "response status");
        check_status(response)
    }
}

#[cfg(test)]
mod tests {
    use hubrest_core::{Body, Headers};

    use super::*;

    fn response(status: u16, text: &str) -> Response {
        Response::new("HTTP/1.1", status, text, Headers::new(), Body::empty())
    }

    #[test]
    fn success_and_redirect_statuses_pass() {
        for status in [200, 201, 204, 304] {
            assert!(check_status(response(status, "")).is_ok(), "{status}");
        }
    }

    #[test]
    fn error_statuses_are_classified() {
        let err = check_status(response(404, "Not Found")).expect_err("404");
        assert!(matches!(err, Error::Client { status: 404, .. }));
        assert_eq!(err.to_string(), "Client Error: 404 Not Found");

        let err = check_status(response(502, "Bad Gateway")).expect_err("502");
        assert!(matches!(err, Error::Server { status: 502, .. }));
        assert_eq!(err.to_string(), "Server Error: 502 Bad Gateway");
    }
}
