//! Header normalization.
//!
//! Derives script-friendly entries from a handful of GitHub response headers:
//!
//! - `Link: <url>; rel="next", <url>; rel="last"` adds `Link_next` and `Link_last`
//! - `ETag: "abc"` becomes `ETag: abc`
//! - `X-RateLimit-*` is lifted into a [`RateLimit`] returned next to the headers
//!
//! Normalization is a pure function of the headers and the clock, and running
//! it on already normalized headers changes nothing.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::Headers;

/// Prefix of the derived relation-link entries.
pub const LINK_PREFIX: &str = "Link_";

/// Rate-limit quota reported by the server with a response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimit {
    /// Maximum requests per window (`X-RateLimit-Limit`).
    pub limit: Option<u64>,
    /// Requests left in the current window (`X-RateLimit-Remaining`).
    pub remaining: Option<u64>,
    /// Seconds until the window resets, negative once the reset time has passed.
    pub reset_in: Option<i64>,
}

impl RateLimit {
    /// Returns `true` if no counter was reported.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.limit.is_none() && self.remaining.is_none() && self.reset_in.is_none()
    }

    /// Keep the counters of `newer`, falling back to ours where it has none.
    #[must_use]
    pub const fn merge(self, newer: Self) -> Self {
        Self {
            limit: match newer.limit {
                Some(limit) => Some(limit),
                None => self.limit,
            },
            remaining: match newer.remaining {
                Some(remaining) => Some(remaining),
                None => self.remaining,
            },
            reset_in: match newer.reset_in {
                Some(reset_in) => Some(reset_in),
                None => self.reset_in,
            },
        }
    }
}

/// Headers after normalization, with the rate limit they carried.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    /// Headers with the derived entries added.
    pub headers: Headers,
    /// Rate-limit counters, if the response carried any.
    pub rate_limit: Option<RateLimit>,
}

/// Normalize response headers.
///
/// `now` is the reference instant for `X-RateLimit-Reset`.
#[must_use]
pub fn normalize(mut headers: Headers, now: SystemTime) -> Normalized {
    if let Some(links) = headers.get_ignore_case("Link").map(parse_link_header) {
        for (rel, url) in links {
            headers.insert(format!("{LINK_PREFIX}{rel}"), url);
        }
    }

    if let Some((name, etag)) = find_entry(&headers, "ETag") {
        let unwrapped = unquote(&etag).to_string();
        if unwrapped != etag {
            headers.insert(name, unwrapped);
        }
    }

    let rate_limit = rate_limit(&headers, now);
    Normalized {
        headers,
        rate_limit,
    }
}

/// Split a `Link` header into `(rel, url)` pairs.
///
/// Segments without a `rel="..."` parameter or without an `<url>` are skipped.
#[must_use]
pub fn parse_link_header(value: &str) -> Vec<(String, String)> {
    value
        .split(", ")
        .filter_map(|segment| {
            let mut parts = segment.split(';').map(str::trim);
            let url = parts
                .next()?
                .strip_prefix('<')
                .and_then(|s| s.strip_suffix('>'))?;
            let rel = parts.find_map(|part| part.strip_prefix("rel="))?;
            let rel = rel.trim_matches('"');
            (!rel.is_empty()).then(|| (rel.to_string(), url.to_string()))
        })
        .collect()
}

/// Strip one pair of surrounding double quotes.
///
/// Values that are not wrapped on both ends (including weak `W/"..."`
/// validators) are returned unchanged.
#[must_use]
pub fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn find_entry(headers: &Headers, name: &str) -> Option<(String, String)> {
    headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(n, v)| (n.to_string(), v.to_string()))
}

fn rate_limit(headers: &Headers, now: SystemTime) -> Option<RateLimit> {
    let number = |name: &str| {
        headers
            .get_ignore_case(name)
            .and_then(|v| v.trim().parse::<u64>().ok())
    };
    let reset_in = headers
        .get_ignore_case("X-RateLimit-Reset")
        .and_then(|v| v.trim().parse::<i64>().ok())
        .map(|reset| reset.saturating_sub(unix_seconds(now)));

    let rate_limit = RateLimit {
        limit: number("X-RateLimit-Limit"),
        remaining: number("X-RateLimit-Remaining"),
        reset_in,
    };
    (!rate_limit.is_empty()).then_some(rate_limit)
}

fn unix_seconds(now: SystemTime) -> i64 {
    match now.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_secs()).map_or(i64::MIN, |s| -s),
    }
}
