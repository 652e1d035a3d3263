//! Pagination driver.
//!
//! GitHub pages list endpoints and announces the following page in the
//! `Link` header. [`Pages`] starts from an already checked first response and
//! fetches each `Link_next` URL in turn, strictly one page after the other,
//! until no next link remains, the [`Follow`] budget is spent, or a page fails.

use bytes::Bytes;
use futures_util::stream;
use tracing::debug;

use crate::verbs::check_status;
use crate::{
    ApiClient, ApiRequest, Body, BodyStream, CallContext, Error, Headers, HttpClient, Method,
    RateLimit, Response, Result,
};

/// How many `next` links to follow after the first page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Follow {
    /// Only the first page.
    #[default]
    Disabled,
    /// At most this many additional pages.
    Limit(usize),
    /// Every page.
    Unlimited,
}

impl Follow {
    /// `None` follows every page, `Some(0)` disables following.
    #[must_use]
    pub const fn from_limit(limit: Option<usize>) -> Self {
        match limit {
            None => Self::Unlimited,
            Some(0) => Self::Disabled,
            Some(limit) => Self::Limit(limit),
        }
    }

    /// Spend one follow; `false` once the budget is exhausted.
    const fn take(&mut self) -> bool {
        match self {
            Self::Disabled | Self::Limit(0) => false,
            Self::Limit(remaining) => {
                *remaining -= 1;
                true
            }
            Self::Unlimited => true,
        }
    }
}

/// Lazy, ordered sequence of pages for one GET call.
///
/// Not restartable: every page is handed out once.
#[derive(Debug)]
pub struct Pages<C> {
    client: ApiClient<C>,
    ctx: CallContext,
    headers: Headers,
    pending: Option<Response>,
    next: Option<String>,
    follow: Follow,
    rate_limit: Option<RateLimit>,
    fetched: usize,
}

impl<C> Pages<C> {
    pub(crate) fn new(
        client: ApiClient<C>,
        ctx: CallContext,
        headers: Headers,
        first: Response,
        follow: Follow,
    ) -> Self {
        let mut pages = Self {
            client,
            ctx,
            headers,
            pending: None,
            next: None,
            follow,
            rate_limit: None,
            fetched: 0,
        };
        pages.pending = Some(pages.record(first));
        pages
    }

    /// Rate limit reported by the most recent page that carried one.
    #[must_use]
    pub const fn rate_limit(&self) -> Option<RateLimit> {
        self.rate_limit
    }

    /// Number of pages received so far.
    #[must_use]
    pub const fn fetched(&self) -> usize {
        self.fetched
    }

    /// URL of the page that would be requested next.
    #[must_use]
    pub fn next_url(&self) -> Option<&str> {
        self.next.as_deref()
    }

    fn record(&mut self, response: Response) -> Response {
        self.fetched += 1;
        self.next = response.next_link().map(str::to_string);
        self.rate_limit = match (self.rate_limit, response.rate_limit()) {
            (Some(older), Some(newer)) => Some(older.merge(newer)),
            (older, newer) => newer.or(older),
        };
        response
    }
}

impl<C: HttpClient> Pages<C> {
    /// Next page, or `None` when the sequence is over.
    ///
    /// # Errors
    ///
    /// Returns the status error of a failed page, a transport error, or
    /// [`Error::Cancelled`] when the context was cancelled before the request.
    pub async fn next_page(&mut self) -> Result<Option<Response>> {
        if let Some(first) = self.pending.take() {
            return Ok(Some(first));
        }
        let Some(url) = self.next.take() else {
            return Ok(None);
        };
        if !self.follow.take() {
            debug!(next = %url, "follow budget spent");
            return Ok(None);
        }
        if self.ctx.is_cancelled() {
            return Err(Error::Cancelled);
        }

        debug!(page = self.fetched + 1, %url, "following next page");

        // GitHub announces absolute URLs, which are sent exactly as given
        let request = ApiRequest {
            headers: self.headers.clone(),
            ..ApiRequest::new(url).method(Method::Get)
        };
        let response = check_status(self.client.execute(request, &self.ctx).await?)?;
        Ok(Some(self.record(response)))
    }
}

impl<C: HttpClient + 'static> Pages<C> {
    /// Concatenated bodies of all pages, in page order.
    ///
    /// A failing page ends the stream with its error after every earlier body
    /// chunk has been yielded.
    #[must_use]
    pub fn into_body_stream(self) -> BodyStream {
        let chunks = stream::try_unfold(
            (self, None::<Body>),
            |(mut pages, mut body)| async move {
                let chunk = pages.next_chunk(&mut body).await;
                chunk.map(|chunk| chunk.map(|chunk| (chunk, (pages, body))))
            },
        );
        Box::pin(chunks)
    }

    async fn next_chunk(&mut self, body: &mut Option<Body>) -> Result<Option<Bytes>> {
        loop {
            if let Some(current) = body.as_mut() {
                if let Some(chunk) = current.next_chunk().await.transpose()? {
                    return Ok(Some(chunk));
                }
                *body = None;
            }
            match self.next_page().await? {
                Some(response) => *body = Some(response.into_body()),
                None => return Ok(None),
            }
        }
    }
}
