//! HTTP response handling.
//!
//! [`Response`] carries the status line, the ordered headers and a streaming
//! [`Body`]. After [`Response::normalize`] it also carries the derived
//! header entries and the [`RateLimit`] the server reported.

use std::time::SystemTime;

use bytes::Bytes;

use crate::{Body, Headers, RateLimit, Result, normalize};

/// HTTP response with status line, headers, and streaming body.
#[derive(Debug)]
pub struct Response {
    version: String,
    status: u16,
    status_text: String,
    headers: Headers,
    body: Body,
    rate_limit: Option<RateLimit>,
}

impl Response {
    /// Creates a new response.
    #[must_use]
    pub fn new(
        version: impl Into<String>,
        status: u16,
        status_text: impl Into<String>,
        headers: Headers,
        body: Body,
    ) -> Self {
        Self {
            version: version.into(),
            status,
            status_text: status_text.into(),
            headers,
            body,
            rate_limit: None,
        }
    }

    /// Protocol version from the status line.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Reason phrase from the status line.
    #[must_use]
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Single header value by exact name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Rate-limit counters, set by [`Response::normalize`].
    #[must_use]
    pub const fn rate_limit(&self) -> Option<RateLimit> {
        self.rate_limit
    }

    /// URL of the `next` relation, once normalized.
    #[must_use]
    pub fn next_link(&self) -> Option<&str> {
        self.headers.get("Link_next").filter(|url| !url.is_empty())
    }

    /// Add the derived header entries and lift the rate-limit counters.
    #[must_use]
    pub fn normalize(mut self, now: SystemTime) -> Self {
        let normalized = normalize::normalize(std::mem::take(&mut self.headers), now);
        self.headers = normalized.headers;
        self.rate_limit = normalized.rate_limit;
        self
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Status is 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Status is 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }

    /// Consume into body.
    #[must_use]
    pub fn into_body(self) -> Body {
        self.body
    }

    /// Split off the body, keeping the head.
    #[must_use]
    pub fn into_parts(self) -> (Head, Body) {
        let head = Head {
            version: self.version,
            status: self.status,
            status_text: self.status_text,
            headers: self.headers,
            rate_limit: self.rate_limit,
        };
        (head, self.body)
    }

    /// Buffer the whole body.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the body fails.
    pub async fn bytes(self) -> Result<Bytes> {
        self.body.collect().await
    }

    /// Buffer the body and deserialize it as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or deserialization fails.
    pub async fn json<T: serde::de::DeserializeOwned>(self) -> Result<T> {
        let bytes = self.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Everything of a [`Response`] but its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Head {
    /// Protocol version.
    pub version: String,
    /// HTTP status code.
    pub status: u16,
    /// Reason phrase.
    pub status_text: String,
    /// Normalized headers.
    pub headers: Headers,
    /// Rate-limit counters.
    pub rate_limit: Option<RateLimit>,
}

#[cfg(test)]
mod tests {
    use std::time::UNIX_EPOCH;

    use super::*;

    fn response(status: u16, headers: &[(&str, &str)], body: &'static str) -> Response {
        Response::new(
            "HTTP/1.1",
            status,
            "",
            headers.iter().copied().collect(),
            Body::from_bytes(body),
        )
    }

    #[test]
    fn response_basic() {
        let response = response(200, &[("Content-Type", "application/json")], "{}");

        assert_eq!(response.status(), 200);
        assert_eq!(response.version(), "HTTP/1.1");
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert!(response.is_success());
        assert!(!response.is_client_error());
        assert!(!response.is_server_error());
        assert!(response.rate_limit().is_none());
    }

    #[test]
    fn response_status_checks() {
        assert!(response(404, &[], "").is_client_error());
        assert!(response(500, &[], "").is_server_error());
        assert!(!response(304, &[], "").is_success());
    }

    #[test]
    fn normalize_sets_next_link_and_rate_limit() {
        let response = response(
            200,
            &[
                ("Link", "<https://api.github.com/x?page=2>; rel=\"next\""),
                ("X-RateLimit-Remaining", "59"),
            ],
            "[]",
        )
        .normalize(UNIX_EPOCH);

        assert_eq!(response.next_link(), Some("https://api.github.com/x?page=2"));
        assert_eq!(
            response.rate_limit().and_then(|r| r.remaining),
            Some(59)
        );
    }

    #[tokio::test]
    async fn response_json() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct Repo {
            id: u64,
            name: String,
        }

        let repo: Repo = response(200, &[], r#"{"id":1,"name":"hubrest"}"#)
            .json()
            .await
            .expect("deserialize");
        assert_eq!(
            repo,
            Repo {
                id: 1,
                name: "hubrest".to_string()
            }
        );
    }

    #[test]
    fn into_parts_keeps_head() {
        let (head, _body) = response(201, &[("Location", "/x")], "").into_parts();
        assert_eq!(head.status, 201);
        assert_eq!(head.headers.get("Location"), Some("/x"));
    }
}
