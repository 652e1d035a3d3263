//! Request executor.
//!
//! [`ApiClient`] wraps any [`HttpClient`] with the configured base URL and
//! standard headers. It resolves the request path, encodes the payload, adds
//! `Accept`, `User-Agent`, `Content-Type` and `If-None-Match`, sends the request
//! once, and normalizes the response headers.

use std::future::Future;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use bytes::Bytes;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};
use tracing::debug;
use url::Url;

use crate::config::{ClientConfig, DEFAULT_ACCEPT, DEFAULT_USER_AGENT};
use crate::{
    ContentType, Error, Headers, HttpClient, Method, Params, Request, Response, Result,
    resolve_url,
};

/// Content type sent with a body when the caller gives none.
const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Request executor bound to one API root.
///
/// # Example
///
/// ```no_run
/// use hubrest::{ApiClient, ApiRequest, CallContext, ClientConfig, HyperClient};
///
/// # async fn run() -> hubrest::Result<()> {
/// let config = ClientConfig::default();
/// let client = ApiClient::new(HyperClient::with_config(config.clone()), &config)?;
/// let response = client
///     .execute(ApiRequest::new("/rate_limit"), &CallContext::default())
///     .await?;
/// println!("{}", response.status());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient<C> {
    client: C,
    base_url: Url,
    accept: String,
    user_agent: String,
}

impl<C> ApiClient<C> {
    /// Create a new executor from the configured base URL and headers.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be parsed.
    pub fn new(client: C, config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client,
            base_url: Url::parse(&config.base_url)?,
            accept: config.accept.clone(),
            user_agent: config.user_agent.clone(),
        })
    }

    /// Create a new executor with a pre-parsed URL and default headers.
    #[must_use]
    pub fn with_url(client: C, base_url: Url) -> Self {
        Self {
            client,
            base_url,
            accept: DEFAULT_ACCEPT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Base URL relative paths are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `Accept` header value.
    #[must_use]
    pub fn accept(&self) -> &str {
        &self.accept
    }

    /// Get a reference to the inner HTTP client.
    #[must_use]
    pub fn inner(&self) -> &C {
        &self.client
    }

    /// Consume the wrapper and return the inner HTTP client.
    #[must_use]
    pub fn into_inner(self) -> C {
        self.client
    }
}

impl<C: HttpClient> ApiClient<C> {
    /// Build and send one request, returning the normalized response.
    ///
    /// The status is not checked here; see the verb wrappers for that.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built, the transport fails,
    /// the deadline elapses or the call is cancelled.
    pub async fn execute(&self, request: ApiRequest, ctx: &CallContext) -> Result<Response> {
        let request = self.prepare(request).await?;
        self.send(request, ctx).await
    }

    /// Turn an [`ApiRequest`] into the wire-level [`Request`].
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the payload cannot be read.
    pub async fn prepare(&self, request: ApiRequest) -> Result<Request> {
        let ApiRequest {
            method,
            path,
            query,
            headers,
            payload,
            etag,
        } = request;

        let body = match payload {
            Some(payload) => Some(payload.into_body().await?),
            None => None,
        };
        let method = method.unwrap_or_else(|| Method::default_for(body.is_some()));
        let url = resolve_url(&self.base_url, &path)?;

        let mut builder = Request::builder(method, url)
            .raw_query(&query)
            .header("Accept", self.accept.as_str())
            .header("User-Agent", self.user_agent.as_str());
        if let Some((bytes, content_type)) = body {
            builder = builder.header("Content-Type", content_type).body(bytes);
        }
        if let Some(etag) = etag {
            builder = builder.if_none_match(&etag);
        }

        Ok(builder.headers(headers).build())
    }

    async fn send(&self, request: Request, ctx: &CallContext) -> Result<Response> {
        if ctx.is_cancelled() {
            return Err(Error::Cancelled);
        }
        debug!(method = %request.method(), url = %request.url(), "executing request");

        let call = with_deadline(ctx.timeout(), self.client.execute(request));
        let response = tokio::select! {
            biased;
            () = ctx.cancelled() => return Err(Error::Cancelled),
            result = call => result?,
        };

        Ok(response.normalize(SystemTime::now()))
    }
}

async fn with_deadline<F>(deadline: Option<Duration>, call: F) -> Result<Response>
where
    F: Future<Output = Result<Response>>,
{
    match deadline {
        Some(deadline) => tokio::time::timeout(deadline, call)
            .await
            .map_err(|_| Error::Timeout)?,
        None => call.await,
    }
}

/// One API call as the caller describes it.
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    pub(crate) method: Option<Method>,
    pub(crate) path: String,
    pub(crate) query: String,
    pub(crate) headers: Headers,
    pub(crate) payload: Option<Payload>,
    pub(crate) etag: Option<String>,
}

impl ApiRequest {
    /// Request for `path`, relative to the base URL or absolute.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Force the method instead of deriving it from the payload.
    #[must_use]
    pub const fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Append `params` to the query string.
    #[must_use]
    pub fn query(mut self, params: &Params) -> Self {
        let encoded = params.to_query_string();
        if !encoded.is_empty() {
            if !self.query.is_empty() {
                self.query.push('&');
            }
            self.query.push_str(&encoded);
        }
        self
    }

    /// Extra request header; overrides the standard ones.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Request body.
    #[must_use]
    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Send `etag` as `If-None-Match`.
    #[must_use]
    pub fn etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }

    /// Request path as given.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Request body source.
#[derive(Debug, Clone)]
pub enum Payload {
    /// A JSON document, sent as `application/json`.
    Json(serde_json::Value),
    /// Raw bytes, sent as `application/json` unless a type is given.
    Raw {
        /// Body bytes.
        bytes: Bytes,
        /// Explicit `Content-Type`.
        content_type: Option<String>,
    },
    /// A local file; without an explicit type it is inferred from the extension.
    File {
        /// File to upload.
        path: PathBuf,
        /// Explicit `Content-Type`.
        content_type: Option<String>,
    },
}

impl Payload {
    /// `name=value` pairs as a flat JSON object.
    #[must_use]
    pub fn params(params: &Params) -> Self {
        Self::Json(params.to_json_value())
    }

    /// Raw bytes.
    #[must_use]
    pub fn raw(bytes: impl Into<Bytes>) -> Self {
        Self::Raw {
            bytes: bytes.into(),
            content_type: None,
        }
    }

    /// Contents of a local file.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File {
            path: path.into(),
            content_type: None,
        }
    }

    /// Override the `Content-Type`.
    #[must_use]
    pub fn with_content_type(self, content_type: impl Into<String>) -> Self {
        let content_type = Some(content_type.into());
        match self {
            Self::Json(value) => Self::Raw {
                bytes: Bytes::from(value.to_string()),
                content_type,
            },
            Self::Raw { bytes, .. } => Self::Raw {
                bytes,
                content_type,
            },
            Self::File { path, .. } => Self::File { path, content_type },
        }
    }

    /// Body bytes and the `Content-Type` to send them with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a file whose extension has no
    /// known media type and no override, or an I/O error if it cannot be read.
    pub async fn into_body(self) -> Result<(Bytes, String)> {
        match self {
            Self::Json(value) => Ok((
                Bytes::from(serde_json::to_vec(&value)?),
                DEFAULT_CONTENT_TYPE.to_string(),
            )),
            Self::Raw {
                bytes,
                content_type,
            } => Ok((
                bytes,
                content_type.unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            )),
            Self::File { path, content_type } => {
                let content_type = match content_type {
                    Some(content_type) => content_type,
                    None => ContentType::from_path(&path)?.to_string(),
                };
                let bytes = tokio::fs::read(&path).await?;
                debug!(path = %path.display(), size = bytes.len(), %content_type, "read upload");
                Ok((Bytes::from(bytes), content_type))
            }
        }
    }
}

/// Per-call cancellation and deadline.
///
/// Cancelling the token aborts an in-flight request and stops a pagination
/// loop before its next request.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancel: CancellationToken,
    timeout: Option<Duration>,
}

impl CallContext {
    /// A context that is never cancelled and has no extra deadline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `token` for cancellation.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Deadline for each request made under this context, on top of the
    /// transport timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Per-request deadline.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The cancellation token.
    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Cancel every call using this context.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns `true` once cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Completes when the context is cancelled.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.cancel.cancelled()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use assert2::{check, let_assert};
    use hubrest_core::Body;

    use super::*;

    /// Records requests and answers each with an empty 200.
    #[derive(Debug, Clone, Default)]
    struct Recorder {
        requests: Arc<Mutex<Vec<Request>>>,
    }

    impl Recorder {
        fn last(&self) -> Request {
            self.requests
                .lock()
                .expect("lock")
                .last()
                .cloned()
                .expect("a request was sent")
        }
    }

    impl HttpClient for Recorder {
        async fn execute(&self, request: Request) -> Result<Response> {
            self.requests.lock().expect("lock").push(request);
            let headers: Headers = [("ETag", "\"abc\"")].into_iter().collect();
            Ok(Response::new("HTTP/1.1", 200, "OK", headers, Body::empty()))
        }
    }

    fn client() -> (ApiClient<Recorder>, Recorder) {
        let recorder = Recorder::default();
        let base = Url::parse("https://api.github.com").expect("url");
        (ApiClient::with_url(recorder.clone(), base), recorder)
    }

    #[tokio::test]
    async fn get_without_body_sends_standard_headers() {
        let (client, recorder) = client();
        let response = client
            .execute(ApiRequest::new("/user/repos"), &CallContext::new())
            .await
            .expect("response");

        let request = recorder.last();
        check!(request.method() == Method::Get);
        check!(request.url().as_str() == "https://api.github.com/user/repos");
        check!(request.header("Accept") == Some("application/vnd.github.v3+json"));
        check!(request.header("User-Agent").is_some_and(|ua| ua.starts_with("hubrest/")));
        check!(request.header("Content-Type").is_none());
        check!(request.body().is_none());

        // normalized on the way back
        check!(response.header("ETag") == Some("abc"));
    }

    #[tokio::test]
    async fn body_defaults_to_post_and_json() {
        let (client, recorder) = client();
        let params = Params::parse(["name=hubrest", "private=true"]).expect("params");
        client
            .execute(
                ApiRequest::new("/user/repos").payload(Payload::params(&params)),
                &CallContext::new(),
            )
            .await
            .expect("response");

        let request = recorder.last();
        check!(request.method() == Method::Post);
        check!(request.header("Content-Type") == Some("application/json"));
        let_assert!(Some(body) = request.body());
        check!(body.as_ref() == br#"{"name":"hubrest","private":true}"#);
    }

    #[tokio::test]
    async fn absolute_path_and_query() {
        let (client, recorder) = client();
        let params = Params::parse(["per_page=100", "_internal=x"]).expect("params");
        client
            .execute(
                ApiRequest::new("https://uploads.github.com/repos/o/r/releases/1/assets?name=a.zip")
                    .query(&params),
                &CallContext::new(),
            )
            .await
            .expect("response");

        check!(
            recorder.last().url().as_str()
                == "https://uploads.github.com/repos/o/r/releases/1/assets?name=a.zip&per_page=100"
        );
    }

    #[tokio::test]
    async fn etag_becomes_quoted_if_none_match() {
        let (client, recorder) = client();
        client
            .execute(ApiRequest::new("/user").etag("abc"), &CallContext::new())
            .await
            .expect("response");

        check!(recorder.last().header("If-None-Match") == Some("\"abc\""));
    }

    #[tokio::test]
    async fn caller_headers_override_standard_ones() {
        let (client, recorder) = client();
        client
            .execute(
                ApiRequest::new("/repos/o/r/readme").header("Accept", "application/vnd.github.raw"),
                &CallContext::new(),
            )
            .await
            .expect("response");

        check!(recorder.last().header("Accept") == Some("application/vnd.github.raw"));
    }

    #[tokio::test]
    async fn cancelled_context_sends_nothing() {
        let (client, recorder) = client();
        let ctx = CallContext::new();
        ctx.cancel();

        let result = client.execute(ApiRequest::new("/user"), &ctx).await;
        let_assert!(Err(Error::Cancelled) = result);
        check!(recorder.requests.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn raw_payload_with_content_type() {
        let (bytes, content_type) = Payload::raw("# Title")
            .with_content_type("text/markdown")
            .into_body()
            .await
            .expect("body");
        check!(bytes.as_ref() == b"# Title");
        check!(content_type == "text/markdown");
    }

    #[tokio::test]
    async fn file_payload_infers_content_type() {
        let path = std::env::temp_dir().join(format!("hubrest-{}.txt", std::process::id()));
        std::fs::write(&path, "notes").expect("write temp file");

        let result = Payload::file(&path).into_body().await;
        std::fs::remove_file(&path).expect("remove temp file");

        let (bytes, content_type) = result.expect("body");
        check!(bytes.as_ref() == b"notes");
        check!(content_type == "text/plain");
    }

    #[tokio::test]
    async fn unknown_extension_needs_override() {
        let result = Payload::file("artifact.unknownext").into_body().await;
        let_assert!(Err(Error::InvalidArgument(_)) = result);
    }
}
