//! Error types for hubrest.

use derive_more::{Display, Error, From};

use crate::{RateLimit, Response};

/// Main error type for hubrest operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Malformed `name=value` pair, missing argument or unsupported option.
    #[display("invalid argument: {_0}")]
    #[from(skip)]
    InvalidArgument(#[error(not(source))] String),

    /// Network, DNS or TLS failure from the underlying transport.
    #[display("transport error: {_0}")]
    #[from(skip)]
    Transport(#[error(not(source))] String),

    /// The call deadline elapsed before the response head arrived.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// The caller cancelled the call.
    #[display("request cancelled")]
    #[from(skip)]
    Cancelled,

    /// The server answered with a 4xx status.
    #[display("Client Error: {status} {text}")]
    #[from(skip)]
    Client {
        /// HTTP status code.
        status: u16,
        /// Status text from the status line.
        text: String,
        /// Rate-limit counters the failed response carried.
        rate_limit: Option<RateLimit>,
    },

    /// The server answered with a 5xx status.
    #[display("Server Error: {status} {text}")]
    #[from(skip)]
    Server {
        /// HTTP status code.
        status: u16,
        /// Status text from the status line.
        text: String,
        /// Rate-limit counters the failed response carried.
        rate_limit: Option<RateLimit>,
    },

    /// The server answered with a status the operation does not accept.
    #[display("Unexpected Status: {status} {text}")]
    #[from(skip)]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Status text from the status line.
        text: String,
        /// Rate-limit counters the failed response carried.
        rate_limit: Option<RateLimit>,
    },

    /// Malformed HTTP response stream.
    #[display("parse error: {_0}")]
    #[from(skip)]
    Parse(#[error(not(source))] String),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// I/O error while reading a response stream or a local file.
    #[display("I/O error: {_0}")]
    #[from]
    Io(std::io::Error),

    /// JSON error.
    #[display("JSON error: {_0}")]
    #[from]
    Json(serde_json::Error),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Create a parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Classify a non-accepted status code.
    ///
    /// The leading digit decides between [`Error::Client`] and [`Error::Server`];
    /// anything else becomes [`Error::UnexpectedStatus`].
    #[must_use]
    pub fn from_status(status: u16, text: impl Into<String>) -> Self {
        Self::classify(status, text.into(), None)
    }

    /// Classify the status of a rejected response, keeping its rate limit.
    #[must_use]
    pub fn from_response(response: &Response) -> Self {
        Self::classify(
            response.status(),
            response.status_text().to_string(),
            response.rate_limit(),
        )
    }

    fn classify(status: u16, text: String, rate_limit: Option<RateLimit>) -> Self {
        match status / 100 {
            4 => Self::Client {
                status,
                text,
                rate_limit,
            },
            5 => Self::Server {
                status,
                text,
                rate_limit,
            },
            _ => Self::UnexpectedStatus {
                status,
                text,
                rate_limit,
            },
        }
    }

    /// Rate-limit counters of the response behind a status error.
    #[must_use]
    pub const fn rate_limit(&self) -> Option<RateLimit> {
        match self {
            Self::Client { rate_limit, .. }
            | Self::Server { rate_limit, .. }
            | Self::UnexpectedStatus { rate_limit, .. } => *rate_limit,
            _ => None,
        }
    }

    /// Returns the HTTP status code if this error comes from a response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Client { status, .. }
            | Self::Server { status, .. }
            | Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Client { .. })
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Server { .. })
    }

    /// Returns `true` if the request never produced a response.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Timeout | Self::Cancelled | Self::Io(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::from_status(404, "Not Found");
        assert_eq!(err.to_string(), "Client Error: 404 Not Found");

        let err = Error::from_status(502, "Bad Gateway");
        assert_eq!(err.to_string(), "Server Error: 502 Bad Gateway");

        let err = Error::invalid_argument("missing '=' in 'foo'");
        assert_eq!(err.to_string(), "invalid argument: missing '=' in 'foo'");

        assert_eq!(Error::Timeout.to_string(), "request timeout");
    }

    #[test]
    fn status_classification_by_leading_digit() {
        assert!(Error::from_status(404, "Not Found").is_client_error());
        assert!(Error::from_status(422, "Unprocessable Entity").is_client_error());
        assert!(Error::from_status(500, "Internal Server Error").is_server_error());
        assert!(matches!(
            Error::from_status(200, "OK"),
            Error::UnexpectedStatus { status: 200, .. }
        ));
    }

    #[test]
    fn error_status() {
        assert_eq!(Error::from_status(404, "Not Found").status(), Some(404));
        assert_eq!(Error::Timeout.status(), None);
        assert_eq!(Error::parse("missing status line").status(), None);
    }

    #[test]
    fn rejected_response_keeps_rate_limit() {
        let headers: crate::Headers = [("X-RateLimit-Remaining", "0"), ("X-RateLimit-Limit", "60")]
            .into_iter()
            .collect();
        let response = Response::new("HTTP/1.1", 403, "Forbidden", headers, crate::Body::empty())
            .normalize(std::time::SystemTime::UNIX_EPOCH);

        let err = Error::from_response(&response);
        assert_eq!(err.to_string(), "Client Error: 403 Forbidden");
        let rate_limit = err.rate_limit().expect("rate limit");
        assert_eq!(rate_limit.remaining, Some(0));
        assert_eq!(rate_limit.limit, Some(60));

        assert_eq!(Error::from_status(403, "Forbidden").rate_limit(), None);
        assert_eq!(Error::Timeout.rate_limit(), None);
    }

    #[test]
    fn transport_errors() {
        assert!(Error::transport("connection refused").is_transport());
        assert!(Error::Timeout.is_transport());
        assert!(Error::Cancelled.is_transport());
        assert!(!Error::from_status(500, "Internal Server Error").is_transport());
    }
}
