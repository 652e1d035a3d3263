//! HTTP request building.
//!
//! Use [`Request::builder`] to construct requests with headers, query parameters, and bodies.
//!
//! # Example
//!
//! ```
//! use hubrest_core::{Method, Request, resolve_url};
//!
//! let base = "https://api.github.com".parse().unwrap();
//! let url = resolve_url(&base, "/user/repos").unwrap();
//! let request = Request::builder(Method::Get, url)
//!     .header("Accept", "application/vnd.github.v3+json")
//!     .query("per_page", "100")
//!     .build();
//! assert_eq!(request.url().as_str(), "https://api.github.com/user/repos?per_page=100");
//! ```

use bytes::Bytes;
use url::Url;

use crate::{Headers, Method, Result};

/// An HTTP request with method, absolute URL, ordered headers, and optional body.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: Url,
    headers: Headers,
    body: Option<Bytes>,
}

impl Request {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: Url) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Request URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Mutable access to headers.
    #[must_use]
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// Single header value by exact name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Consume into (method, url, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (Method, Url, Headers, Option<Bytes>) {
        (self.method, self.url, self.headers, self.body)
    }
}

/// Builder for constructing [`Request`] instances.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: Url,
    headers: Headers,
    body: Option<Bytes>,
}

impl RequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Headers::new(),
            body: None,
        }
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets multiple headers.
    #[must_use]
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Appends a query parameter to the URL.
    #[must_use]
    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.url.query_pairs_mut().append_pair(name, value);
        self
    }

    /// Appends an already encoded query string to the URL.
    ///
    /// Used for strings produced by [`crate::Params::to_query_string`], whose
    /// escaping must reach the wire untouched.
    #[must_use]
    pub fn raw_query(mut self, encoded: &str) -> Self {
        if encoded.is_empty() {
            return self;
        }
        let query = match self.url.query() {
            Some(existing) if !existing.is_empty() => format!("{existing}&{encoded}"),
            _ => encoded.to_string(),
        };
        self.url.set_query(Some(&query));
        self
    }

    /// Sends `etag` as a conditional `If-None-Match` validator.
    #[must_use]
    pub fn if_none_match(self, etag: &str) -> Self {
        self.header("If-None-Match", quote_etag(etag))
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        }
    }
}

/// Resolve a request path against the configured base URL.
///
/// A path that already carries an `http://` or `https://` scheme is used
/// verbatim. Anything else is appended to the base URL, keeping any path
/// prefix the base carries (e.g. `https://ghe.example.com/api/v3`).
///
/// # Errors
///
/// Returns [`crate::Error::InvalidUrl`] if the result is not a valid URL.
pub fn resolve_url(base: &Url, path: &str) -> Result<Url> {
    if has_scheme(path) {
        return Ok(Url::parse(path)?);
    }

    let base = base.as_str().trim_end_matches('/');
    let url = if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    };
    Ok(Url::parse(&url)?)
}

fn has_scheme(path: &str) -> bool {
    let lower = path.get(..8).unwrap_or(path).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Wrap an entity tag in double quotes for `If-None-Match`.
///
/// Weak validators (`W/"..."`) and values that are already quoted are sent as-is.
#[must_use]
pub fn quote_etag(etag: &str) -> String {
    if etag.starts_with('"') || etag.starts_with("W/") {
        etag.to_string()
    } else {
        format!("\"{etag}\"")
    }
}
