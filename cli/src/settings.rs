//! Settings built once at startup from flags and their environment fallbacks.

use std::time::Duration;

use hubrest::url::Url;
use hubrest::{ApiClient, ClientConfig, HyperClient, Result};

use crate::cli::GlobalArgs;
use crate::credentials::Credentials;

#[derive(Debug)]
pub struct Settings {
    pub config: ClientConfig,
    pub credentials: Credentials,
    pub verbosity: u8,
    pub rate_limit: bool,
    pub assume_yes: bool,
}

impl Settings {
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the netrc file cannot be read.
    pub fn from_args(args: &GlobalArgs) -> Result<Self> {
        let base_url = Url::parse(&args.url)?;

        let mut config = ClientConfig::builder()
            .base_url(base_url.as_str())
            .accept(&args.accept);
        if let Some(seconds) = args.timeout {
            config = config.timeout(Duration::from_secs(seconds));
        }

        let host = base_url.host_str().unwrap_or_default();
        let credentials = Credentials::discover(args.token.as_deref(), args.netrc.as_deref(), host)?;

        Ok(Self {
            config: config.build(),
            credentials,
            verbosity: args.level(),
            rate_limit: args.rate_limit,
            assume_yes: args.assume_yes,
        })
    }

    /// Transport with logging and authentication layers.
    #[must_use]
    pub fn http_client(&self) -> HyperClient {
        let builder = HyperClient::builder().config(self.config.clone());
        let builder = if self.verbosity >= 2 {
            builder.with_debug_logging()
        } else {
            builder.with_logging()
        };
        self.credentials.authorize(builder).build()
    }

    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn api_client(&self) -> Result<ApiClient<HyperClient>> {
        ApiClient::new(self.http_client(), &self.config)
    }
}
