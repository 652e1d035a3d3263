//! `hubrest`, a command-line client for the GitHub v3 REST API.
//!
//! Response bodies go to stdout, preceded by the values of the headers asked
//! for with `-H`. Errors, logs and the rate-limit summary go to stderr, and
//! the exit code tells the error class apart (see [`exit`]).

mod cli;
mod commands;
mod credentials;
mod exit;
mod logging;
mod output;
mod settings;

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use hubrest::Error;

use crate::cli::Cli;
use crate::commands::Runner;
use crate::exit::Exit;
use crate::settings::Settings;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version are not failures
            let exit = if err.use_stderr() {
                Exit::InvalidArguments
            } else {
                Exit::Success
            };
            let _ = err.print();
            return exit.into();
        }
    };

    logging::init(cli.global.level());

    let Some(command) = cli.command else {
        let _ = write!(io::stderr(), "{}", Cli::command().render_help());
        return Exit::NoCommand.into();
    };

    let settings = match Settings::from_args(&cli.global) {
        Ok(settings) => settings,
        Err(err) => return report(&err),
    };
    tracing::debug!(?settings, "starting");

    let runner = match settings.api_client() {
        Ok(api) => Runner::new(api, settings.assume_yes),
        Err(err) => return report(&err),
    };
    let result = runner.run(command, &mut io::stdout().lock()).await;

    if settings.rate_limit
        && let Some(rate_limit) = runner.rate_limit()
    {
        let _ = output::write_rate_limit(&mut io::stderr(), &rate_limit);
    }

    match result {
        Ok(()) => Exit::Success.into(),
        Err(err) => report(&err),
    }
}

fn report(err: &Error) -> ExitCode {
    let message = match err {
        Error::Client { .. } | Error::Server { .. } => err.to_string(),
        _ => format!("error: {err}"),
    };
    let _ = writeln!(io::stderr(), "{message}");
    Exit::from(err).into()
}
