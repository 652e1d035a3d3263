//! Process exit codes.
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | success |
//! | 1 | no command given |
//! | 2 | invalid arguments |
//! | 3 | transport failure, timeout or cancellation |
//! | 4 | client error (4xx) |
//! | 5 | server error (5xx) |
//! | 6 | unexpected status |
//! | 7 | malformed response |

use std::process::ExitCode;

use hubrest::Error;

/// Exit status of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success = 0,
    NoCommand = 1,
    InvalidArguments = 2,
    Transport = 3,
    ClientError = 4,
    ServerError = 5,
    UnexpectedStatus = 6,
    Parse = 7,
}

impl From<&Error> for Exit {
    fn from(err: &Error) -> Self {
        match err {
            Error::InvalidArgument(_) | Error::InvalidUrl(_) => Self::InvalidArguments,
            Error::Transport(_) | Error::Timeout | Error::Cancelled | Error::Io(_) => Self::Transport,
            Error::Client { .. } => Self::ClientError,
            Error::Server { .. } => Self::ServerError,
            Error::UnexpectedStatus { .. } => Self::UnexpectedStatus,
            Error::Parse(_) | Error::Json(_) => Self::Parse,
        }
    }
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        Self::from(exit as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors() {
        assert_eq!(Exit::from(&Error::from_status(404, "Not Found")), Exit::ClientError);
        assert_eq!(Exit::from(&Error::from_status(502, "Bad Gateway")), Exit::ServerError);
        assert_eq!(Exit::from(&Error::from_status(200, "OK")), Exit::UnexpectedStatus);
    }

    #[test]
    fn other_errors() {
        assert_eq!(Exit::from(&Error::invalid_argument("missing '=' in 'foo'")), Exit::InvalidArguments);
        assert_eq!(Exit::from(&Error::transport("connection refused")), Exit::Transport);
        assert_eq!(Exit::from(&Error::Timeout), Exit::Transport);
        assert_eq!(Exit::from(&Error::parse("missing status line")), Exit::Parse);
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(Exit::NoCommand as u8, 1);
        assert_eq!(Exit::InvalidArguments as u8, 2);
        assert_eq!(Exit::ClientError as u8, 4);
        assert_eq!(Exit::ServerError as u8, 5);
    }
}
