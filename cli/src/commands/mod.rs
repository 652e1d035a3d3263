//! Command implementations.

mod catalog;
mod primitive;
mod response;

use std::cell::Cell;
use std::io::{self, BufRead, Write};

use hubrest::{ApiClient, CallContext, Error, HttpClient, Pages, RateLimit, Result};
use tokio::io::BufReader;

use crate::cli::Command;
use crate::output;

/// Runs one command against an API client.
///
/// Keeps the rate-limit counters of every response seen, failed ones
/// included, so they can be reported however the command ends.
#[derive(Debug)]
pub struct Runner<C> {
    api: ApiClient<C>,
    ctx: CallContext,
    assume_yes: bool,
    rate_limit: Cell<Option<RateLimit>>,
}

impl<C> Runner<C> {
    pub fn new(api: ApiClient<C>, assume_yes: bool) -> Self {
        Self {
            api,
            ctx: CallContext::new(),
            assume_yes,
            rate_limit: Cell::new(None),
        }
    }

    /// Latest rate-limit counters, from the most recent response that had them.
    #[must_use]
    pub fn rate_limit(&self) -> Option<RateLimit> {
        self.rate_limit.get()
    }

    fn observe(&self, rate_limit: Option<RateLimit>) {
        let merged = match (self.rate_limit.get(), rate_limit) {
            (Some(older), Some(newer)) => Some(older.merge(newer)),
            (older, newer) => newer.or(older),
        };
        self.rate_limit.set(merged);
    }

    /// Ask on the terminal unless `--yes` was given; a refusal cancels the command.
    fn confirm(&self, question: &str) -> Result<()> {
        if self.assume_yes || ask(question, &mut io::stdin().lock(), &mut io::stderr())? {
            Ok(())
        } else {
            Err(Error::Cancelled)
        }
    }
}

impl<C: HttpClient + Clone + 'static> Runner<C> {
    /// # Errors
    ///
    /// Returns the error of the failed request, or of writing the output.
    pub async fn run<W: Write>(&self, command: Command, out: &mut W) -> Result<()> {
        let result = match command {
            Command::Get(args) => self.get(args, out).await,
            Command::Post(args) => self.send(hubrest::Method::Post, args, out).await,
            Command::Put(args) => self.send(hubrest::Method::Put, args, out).await,
            Command::Patch(args) => self.send(hubrest::Method::Patch, args, out).await,
            Command::Delete(args) => self.delete(args, out).await,
            Command::Response(args) => {
                self.response(args, BufReader::new(tokio::io::stdin()), out).await
            }
            Command::ListRepos(args) => self.list_repos(args, out).await,
            Command::OrgRepos(args) => self.org_repos(args, out).await,
            Command::CreateRepo(args) => self.create_repo(args, out).await,
            Command::DeleteRepo(args) => self.delete_repo(args, out).await,
            Command::ListReleases(args) => self.list_releases(args, out).await,
            Command::Release(args) => self.release(args, out).await,
            Command::CreateRelease(args) => self.create_release(args, out).await,
            Command::DeleteRelease(args) => self.delete_release(args, out).await,
            Command::UploadAsset(args) => self.upload_asset(args, out).await,
            Command::ListIssues(args) => self.list_issues(args, out).await,
            Command::CreateIssue(args) => self.create_issue(args, out).await,
            Command::RateLimit(args) => self.show_rate_limit(args, out).await,
        };
        if let Err(err) = &result {
            self.observe(err.rate_limit());
        }
        result
    }
}

impl<C> Runner<C> {
    /// Headers of the first page, then every page body in order.
    async fn write_pages<P: HttpClient, W: Write>(
        &self,
        mut pages: Pages<P>,
        names: &[String],
        out: &mut W,
    ) -> Result<()> {
        let result = write_each_page(&mut pages, names, out).await;
        self.observe(pages.rate_limit());
        result
    }

    async fn write_response<W: Write>(
        &self,
        response: hubrest::Response,
        names: &[String],
        out: &mut W,
    ) -> Result<()> {
        self.observe(response.rate_limit());
        output::write_response(out, response, names).await?;
        Ok(())
    }
}

async fn write_each_page<P: HttpClient, W: Write>(
    pages: &mut Pages<P>,
    names: &[String],
    out: &mut W,
) -> Result<()> {
    let mut first = true;
    while let Some(page) = pages.next_page().await? {
        if first {
            output::write_headers(out, page.headers(), names)?;
            first = false;
        }
        output::write_body(out, page.into_body()).await?;
    }
    Ok(())
}

/// `true` on `y` or `yes`, in any case.
pub fn ask<R: BufRead, W: Write>(question: &str, input: &mut R, prompt: &mut W) -> io::Result<bool> {
    write!(prompt, "{question} [y/N] ")?;
    prompt.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
pub(crate) mod tests {
    use assert2::check;
    use hubrest::HyperClient;
    use wiremock::MockServer;

    use super::*;

    pub fn runner(server: &MockServer) -> Runner<HyperClient> {
        let base = server.uri().parse().expect("mock server url");
        Runner::new(ApiClient::with_url(HyperClient::new(), base), true)
    }

    pub fn text(out: &[u8]) -> String {
        String::from_utf8_lossy(out).into_owned()
    }

    #[test]
    fn ask_accepts_yes() {
        for answer in ["y\n", "Y\n", "yes\n", " YES \n"] {
            let mut prompt = Vec::new();
            let confirmed = ask("Delete octo/hello?", &mut answer.as_bytes(), &mut prompt).expect("asked");
            check!(confirmed);
            check!(text(&prompt) == "Delete octo/hello? [y/N] ");
        }
    }

    #[test]
    fn ask_defaults_to_no() {
        for answer in ["\n", "n\n", "nope\n", ""] {
            let confirmed = ask("Delete?", &mut answer.as_bytes(), &mut Vec::new()).expect("asked");
            check!(!confirmed);
        }
    }
}
