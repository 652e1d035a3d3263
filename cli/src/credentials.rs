//! Credential discovery.
//!
//! A token wins. Otherwise the netrc file is searched for the API host, then
//! for a `default` entry. Without either, requests go out unauthenticated.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use hubrest::{Error, HyperClientBuilder, Result};

/// Login and password of one netrc entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Machine {
    pub login: Option<String>,
    pub password: Option<String>,
}

/// Parsed netrc file.
#[derive(Debug, Default)]
pub struct Netrc {
    machines: Vec<(String, Machine)>,
    default: Option<Machine>,
}

/// Entry being read: `None` names the `default` entry.
type Entry = (Option<String>, Machine);

impl Netrc {
    /// Parse netrc content.
    ///
    /// Tokens are whitespace separated. `macdef` bodies run up to the next blank
    /// line and are skipped, as are `#` comments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if a keyword lacks its value.
    pub fn parse(content: &str) -> Result<Self> {
        let mut netrc = Self::default();
        let mut current: Option<Entry> = None;
        let mut lines = content.lines();

        while let Some(line) = lines.next() {
            let mut tokens = line.split_whitespace();
            while let Some(token) = tokens.next() {
                match token {
                    "machine" => {
                        let name = value_of(token, tokens.next())?;
                        netrc.push(current.replace((Some(name.to_string()), Machine::default())));
                    }
                    "default" => {
                        netrc.push(current.replace((None, Machine::default())));
                    }
                    "login" | "password" | "account" | "port" => {
                        let value = value_of(token, tokens.next())?;
                        if let Some((_, machine)) = current.as_mut() {
                            match token {
                                "login" => machine.login = Some(value.to_string()),
                                "password" => machine.password = Some(value.to_string()),
                                _ => {}
                            }
                        }
                    }
                    "macdef" => {
                        for line in lines.by_ref() {
                            if line.trim().is_empty() {
                                break;
                            }
                        }
                        break;
                    }
                    comment if comment.starts_with('#') => break,
                    _ => {}
                }
            }
        }
        netrc.push(current);

        Ok(netrc)
    }

    fn push(&mut self, entry: Option<Entry>) {
        match entry {
            Some((Some(name), machine)) => self.machines.push((name, machine)),
            Some((None, machine)) => self.default = Some(machine),
            None => {}
        }
    }

    /// First entry for `host`, else the `default` entry.
    #[must_use]
    pub fn find(&self, host: &str) -> Option<&Machine> {
        self.machines
            .iter()
            .find(|(name, _)| name == host)
            .map(|(_, machine)| machine)
            .or(self.default.as_ref())
    }
}

fn value_of<'a>(keyword: &str, value: Option<&'a str>) -> Result<&'a str> {
    value.ok_or_else(|| Error::invalid_argument(format!("netrc: '{keyword}' without a value")))
}

/// How requests are authenticated.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    #[default]
    Anonymous,
    Token(String),
    Basic { login: String, password: String },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => f.write_str("Anonymous"),
            Self::Token(_) => f.write_str("Token(..)"),
            Self::Basic { login, .. } => f.debug_struct("Basic").field("login", login).finish_non_exhaustive(),
        }
    }
}

impl Credentials {
    /// Credentials for `host` from a netrc file.
    ///
    /// A missing file is only an error when it was asked for explicitly.
    pub fn discover(token: Option<&str>, netrc: Option<&Path>, host: &str) -> Result<Self> {
        if let Some(token) = token {
            return Ok(Self::Token(token.to_string()));
        }

        let (path, explicit) = match netrc {
            Some(path) => (path.to_path_buf(), true),
            None => match default_netrc_path() {
                Some(path) => (path, false),
                None => return Ok(Self::Anonymous),
            },
        };

        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Self::from_netrc(&Netrc::parse(&content)?, host)),
            Err(err) if !explicit && err.kind() == io::ErrorKind::NotFound => Ok(Self::Anonymous),
            Err(err) => Err(err.into()),
        }
    }

    #[must_use]
    pub fn from_netrc(netrc: &Netrc, host: &str) -> Self {
        match netrc.find(host) {
            Some(Machine {
                login: Some(login),
                password: Some(password),
            }) => Self::Basic {
                login: login.clone(),
                password: password.clone(),
            },
            _ => Self::Anonymous,
        }
    }

    /// Add the matching authentication layer.
    #[must_use]
    pub fn authorize(&self, builder: HyperClientBuilder) -> HyperClientBuilder {
        match self {
            Self::Anonymous => builder,
            Self::Token(token) => builder.with_bearer_auth(token.clone()),
            Self::Basic { login, password } => builder.with_basic_auth(login, password),
        }
    }
}

/// `.netrc` in the platform home directory.
fn default_netrc_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".netrc"))
}
