//! Command structure using clap.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use hubrest::{DEFAULT_ACCEPT, DEFAULT_BASE_URL, Follow};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "hubrest")]
#[command(version, about = "Command-line client for the GitHub v3 REST API", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Options shared by every command.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase verbosity (-v info, -vv debug, -vvv wire trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Verbosity level from 0 (quiet) to 3 (wire trace)
    #[arg(long, env = "HUBREST_VERBOSE", value_name = "LEVEL", global = true,
          value_parser = clap::value_parser!(u8).range(0..=3))]
    pub verbosity: Option<u8>,

    /// API base URL
    #[arg(long, env = "HUBREST_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub url: String,

    /// Accept header sent with every request
    #[arg(long, env = "HUBREST_ACCEPT", default_value = DEFAULT_ACCEPT, global = true)]
    pub accept: String,

    /// Token sent as `Authorization: Bearer`
    #[arg(long, env = "HUBREST_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Credentials file, `~/.netrc` when absent
    #[arg(long, env = "HUBREST_NETRC", value_name = "FILE", global = true)]
    pub netrc: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, env = "HUBREST_TIMEOUT", value_name = "SECONDS", global = true)]
    pub timeout: Option<u64>,

    /// Print the remaining rate limit on exit
    #[arg(long, env = "HUBREST_RATE_LIMIT", global = true)]
    pub rate_limit: bool,

    /// Do not ask before destructive actions
    #[arg(short = 'y', long = "yes", env = "HUBREST_DESTRUCTIVE", global = true)]
    pub assume_yes: bool,
}

impl GlobalArgs {
    /// Effective verbosity, the higher of `-v` and `--verbosity`.
    #[must_use]
    pub fn level(&self) -> u8 {
        self.verbosity.unwrap_or(0).max(self.verbose).min(3)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// GET a path, query parameters given as name=value
    Get(GetArgs),

    /// POST to a path, name=value pairs become a JSON body
    Post(SendArgs),

    /// PUT to a path, name=value pairs become a JSON body
    Put(SendArgs),

    /// PATCH a path, name=value pairs become a JSON body
    Patch(SendArgs),

    /// DELETE a path, succeeds only on 204 No Content
    Delete(DeleteArgs),

    /// Parse a raw HTTP response read from stdin
    Response(ResponseArgs),

    /// List repositories of the authenticated user or of USER
    ListRepos(ListReposArgs),

    /// List repositories of an organization
    OrgRepos(OrgReposArgs),

    /// Create a repository
    CreateRepo(CreateRepoArgs),

    /// Delete a repository
    DeleteRepo(RepoArgs),

    /// List releases of a repository
    ListReleases(ListReleasesArgs),

    /// Show one release
    Release(ReleaseArgs),

    /// Create a release
    CreateRelease(CreateReleaseArgs),

    /// Delete a release
    DeleteRelease(ReleaseArgs),

    /// Upload a release asset
    UploadAsset(UploadAssetArgs),

    /// List issues of a repository
    ListIssues(ListIssuesArgs),

    /// Create an issue
    CreateIssue(CreateIssueArgs),

    /// Show the rate limit status
    RateLimit(OutputArgs),
}

/// Response headers to print before the body.
#[derive(Debug, Default, Args)]
pub struct OutputArgs {
    /// Print this response header before the body (repeatable)
    #[arg(short = 'H', long = "header", value_name = "NAME")]
    pub headers: Vec<String>,
}

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Path relative to the base URL, or an absolute URL
    pub path: String,

    /// Query parameters
    #[arg(value_name = "NAME=VALUE")]
    pub params: Vec<String>,

    /// Follow every `next` link
    #[arg(long)]
    pub follow: bool,

    /// Follow at most N `next` links, 0 disables following
    #[arg(long, value_name = "N")]
    pub follow_limit: Option<usize>,

    /// Send `If-None-Match` with this entity tag
    #[arg(long)]
    pub etag: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl GetArgs {
    #[must_use]
    pub fn follow(&self) -> Follow {
        match self.follow_limit {
            Some(limit) => Follow::from_limit(Some(limit)),
            None if self.follow => Follow::Unlimited,
            None => Follow::Disabled,
        }
    }
}

#[derive(Debug, Args)]
pub struct SendArgs {
    /// Path relative to the base URL, or an absolute URL
    pub path: String,

    /// Body fields, or `-` to send stdin as is
    #[arg(value_name = "NAME=VALUE")]
    pub params: Vec<String>,

    /// Send the content of FILE as the body
    #[arg(long, value_name = "FILE", conflicts_with = "params")]
    pub file: Option<PathBuf>,

    /// Content-Type of the body
    #[arg(long, value_name = "MIME")]
    pub content_type: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Path relative to the base URL, or an absolute URL
    pub path: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct ResponseArgs {
    /// Headers to print before the body
    #[arg(value_name = "NAME")]
    pub headers: Vec<String>,
}

/// Pagination of catalog list commands, which follow every page by default.
#[derive(Debug, Default, Args)]
pub struct ListArgs {
    /// Results per page
    #[arg(long, value_name = "N")]
    pub per_page: Option<u8>,

    /// Follow at most N `next` links, 0 disables following
    #[arg(long, value_name = "N")]
    pub follow_limit: Option<usize>,
}

impl ListArgs {
    #[must_use]
    pub const fn follow(&self) -> Follow {
        Follow::from_limit(self.follow_limit)
    }
}

#[derive(Debug, Args)]
pub struct RepoArgs {
    pub owner: String,
    pub repo: String,
}

#[derive(Debug, Args, Serialize)]
pub struct ListReposArgs {
    /// List this user's public repositories instead of your own
    #[serde(skip)]
    pub user: Option<String>,

    /// all, owner, public, private or member
    #[arg(long = "type", value_name = "TYPE")]
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// created, updated, pushed or full_name
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,

    #[command(flatten)]
    #[serde(skip)]
    pub list: ListArgs,
}

#[derive(Debug, Args, Serialize)]
pub struct OrgReposArgs {
    #[serde(skip)]
    pub org: String,

    /// all, public, private, forks, sources or member
    #[arg(long = "type", value_name = "TYPE")]
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[command(flatten)]
    #[serde(skip)]
    pub list: ListArgs,
}

#[derive(Debug, Args, Serialize)]
pub struct CreateRepoArgs {
    pub name: String,

    /// Create the repository in this organization
    #[arg(long)]
    #[serde(skip)]
    pub org: Option<String>,

    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,

    #[arg(long)]
    pub private: bool,

    /// Create an initial commit with an empty README
    #[arg(long)]
    pub auto_init: bool,

    #[command(flatten)]
    #[serde(skip)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct ListReleasesArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    #[command(flatten)]
    pub list: ListArgs,
}

#[derive(Debug, Args)]
pub struct ReleaseArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    pub id: u64,
}

#[derive(Debug, Args, Serialize)]
pub struct CreateReleaseArgs {
    #[command(flatten)]
    #[serde(skip)]
    pub repo: RepoArgs,

    #[serde(rename = "tag_name")]
    pub tag: String,

    /// Commit-ish the tag is created from
    #[arg(long, value_name = "COMMITISH")]
    #[serde(rename = "target_commitish", skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[arg(long)]
    pub draft: bool,

    #[arg(long)]
    pub prerelease: bool,

    #[command(flatten)]
    #[serde(skip)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct UploadAssetArgs {
    /// The release `upload_url`, URI template suffix allowed
    pub upload_url: String,

    pub file: PathBuf,

    /// Asset name, the file name when absent
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub label: Option<String>,

    /// Content-Type of the asset, inferred from the extension when absent
    #[arg(long, value_name = "MIME")]
    pub content_type: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Serialize)]
pub struct ListIssuesArgs {
    #[command(flatten)]
    #[serde(skip)]
    pub repo: RepoArgs,

    /// open, closed or all
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Comma separated label names
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,

    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    #[command(flatten)]
    #[serde(skip)]
    pub list: ListArgs,
}

#[derive(Debug, Args, Serialize)]
pub struct CreateIssueArgs {
    #[command(flatten)]
    #[serde(skip)]
    pub repo: RepoArgs,

    pub title: String,

    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<u64>,

    /// Label name (repeatable)
    #[arg(long = "label", value_name = "NAME")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,

    /// Login to assign (repeatable)
    #[arg(long = "assignee", value_name = "LOGIN")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<String>,

    #[command(flatten)]
    #[serde(skip)]
    pub output: OutputArgs,
}
