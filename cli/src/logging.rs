//! Tracing subscriber setup.

use std::io;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter directive for a verbosity level: 0 error, 1 info, 2 debug, 3 trace.
///
/// Quiet leaves failures to the error message printed on exit.
#[must_use]
pub fn directive(verbosity: u8) -> String {
    match verbosity {
        0 => "error".to_string(),
        1 => "warn,hubrest=info".to_string(),
        2 => "warn,hubrest=debug".to_string(),
        _ => "warn,hubrest=trace".to_string(),
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over the verbosity level.
pub fn init(verbosity: u8) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive(verbosity)));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(directive(0), "error");
        assert_eq!(directive(1), "warn,hubrest=info");
        assert_eq!(directive(2), "warn,hubrest=debug");
        assert_eq!(directive(3), "warn,hubrest=trace");
        assert_eq!(directive(9), "warn,hubrest=trace");
    }
}
