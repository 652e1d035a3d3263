//! Catalog of GitHub operations built on the primitive verbs.
//!
//! Each command turns its typed options into a path plus a query string or a
//! JSON body. List commands follow every page unless `--follow-limit` says
//! otherwise.

use std::io::Write;

use hubrest::{ApiRequest, Error, Follow, HttpClient, Params, Payload, Result};
use serde::Serialize;
use serde_json::Value;

use super::Runner;
use crate::cli::{
    CreateIssueArgs, CreateReleaseArgs, CreateRepoArgs, ListArgs, ListIssuesArgs,
    ListReleasesArgs, ListReposArgs, OrgReposArgs, OutputArgs, ReleaseArgs, RepoArgs,
    UploadAssetArgs,
};

/// Query parameters from the serialized options and the page size.
fn query<T: Serialize>(options: &T, list: &ListArgs) -> Result<Params> {
    let mut params = Params::new();
    if let Value::Object(fields) = serde_json::to_value(options)? {
        for (name, value) in fields {
            params = match value {
                Value::String(value) => params.with(name, value),
                value => params.with(name, value.to_string()),
            };
        }
    }
    if let Some(per_page) = list.per_page {
        params = params.with("per_page", per_page.to_string());
    }
    Ok(params)
}

fn json_body<T: Serialize>(options: &T) -> Result<Payload> {
    Ok(Payload::Json(serde_json::to_value(options)?))
}

/// Strip the `{?name,label}` URI template GitHub appends to `upload_url`.
fn upload_base(upload_url: &str) -> &str {
    upload_url
        .split_once('{')
        .map_or(upload_url, |(base, _)| base)
}

impl<C: HttpClient + Clone + 'static> Runner<C> {
    async fn list<W: Write>(&self, path: String, params: &Params, follow: Follow, out: &mut W) -> Result<()> {
        let request = ApiRequest::new(path).query(params);
        let pages = self.api.get(request, follow, &self.ctx).await?;
        self.write_pages(pages, &[], out).await
    }

    pub(super) async fn list_repos<W: Write>(&self, args: ListReposArgs, out: &mut W) -> Result<()> {
        let path = match &args.user {
            Some(user) => format!("/users/{user}/repos"),
            None => "/user/repos".to_string(),
        };
        let params = query(&args, &args.list)?;
        self.list(path, &params, args.list.follow(), out).await
    }

    pub(super) async fn org_repos<W: Write>(&self, args: OrgReposArgs, out: &mut W) -> Result<()> {
        let params = query(&args, &args.list)?;
        self.list(format!("/orgs/{}/repos", args.org), &params, args.list.follow(), out)
            .await
    }

    pub(super) async fn create_repo<W: Write>(&self, args: CreateRepoArgs, out: &mut W) -> Result<()> {
        let path = match &args.org {
            Some(org) => format!("/orgs/{org}/repos"),
            None => "/user/repos".to_string(),
        };
        let request = ApiRequest::new(path).payload(json_body(&args)?);
        let response = self.api.post(request, &self.ctx).await?;
        self.write_response(response, &args.output.headers, out).await
    }

    pub(super) async fn delete_repo<W: Write>(&self, args: RepoArgs, out: &mut W) -> Result<()> {
        self.confirm(&format!("Delete repository {}/{}?", args.owner, args.repo))?;

        let request = ApiRequest::new(format!("/repos/{}/{}", args.owner, args.repo));
        let response = self.api.delete(request, &self.ctx).await?;
        self.write_response(response, &[], out).await
    }

    pub(super) async fn list_releases<W: Write>(&self, args: ListReleasesArgs, out: &mut W) -> Result<()> {
        let RepoArgs { owner, repo } = &args.repo;
        let params = query(&(), &args.list)?;
        self.list(format!("/repos/{owner}/{repo}/releases"), &params, args.list.follow(), out)
            .await
    }

    pub(super) async fn release<W: Write>(&self, args: ReleaseArgs, out: &mut W) -> Result<()> {
        let RepoArgs { owner, repo } = &args.repo;
        let request = ApiRequest::new(format!("/repos/{owner}/{repo}/releases/{}", args.id));
        let pages = self.api.get(request, Follow::Disabled, &self.ctx).await?;
        self.write_pages(pages, &[], out).await
    }

    pub(super) async fn create_release<W: Write>(&self, args: CreateReleaseArgs, out: &mut W) -> Result<()> {
        let RepoArgs { owner, repo } = &args.repo;
        let request = ApiRequest::new(format!("/repos/{owner}/{repo}/releases")).payload(json_body(&args)?);
        let response = self.api.post(request, &self.ctx).await?;
        self.write_response(response, &args.output.headers, out).await
    }

    pub(super) async fn delete_release<W: Write>(&self, args: ReleaseArgs, out: &mut W) -> Result<()> {
        let RepoArgs { owner, repo } = &args.repo;
        self.confirm(&format!("Delete release {} of {owner}/{repo}?", args.id))?;

        let request = ApiRequest::new(format!("/repos/{owner}/{repo}/releases/{}", args.id));
        let response = self.api.delete(request, &self.ctx).await?;
        self.write_response(response, &[], out).await
    }

    pub(super) async fn upload_asset<W: Write>(&self, args: UploadAssetArgs, out: &mut W) -> Result<()> {
        let name = match args.name {
            Some(name) => name,
            None => args
                .file
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string)
                .ok_or_else(|| Error::invalid_argument(format!("no file name in '{}'", args.file.display())))?,
        };
        let mut params = Params::new().with("name", name);
        if let Some(label) = args.label {
            params = params.with("label", label);
        }

        let payload = Payload::file(args.file);
        let payload = match args.content_type {
            Some(content_type) => payload.with_content_type(content_type),
            None => payload,
        };

        let request = ApiRequest::new(upload_base(&args.upload_url))
            .query(&params)
            .payload(payload);
        let response = self.api.post(request, &self.ctx).await?;
        self.write_response(response, &args.output.headers, out).await
    }

    pub(super) async fn list_issues<W: Write>(&self, args: ListIssuesArgs, out: &mut W) -> Result<()> {
        let RepoArgs { owner, repo } = &args.repo;
        let params = query(&args, &args.list)?;
        self.list(format!("/repos/{owner}/{repo}/issues"), &params, args.list.follow(), out)
            .await
    }

    pub(super) async fn create_issue<W: Write>(&self, args: CreateIssueArgs, out: &mut W) -> Result<()> {
        let RepoArgs { owner, repo } = &args.repo;
        let request = ApiRequest::new(format!("/repos/{owner}/{repo}/issues")).payload(json_body(&args)?);
        let response = self.api.post(request, &self.ctx).await?;
        self.write_response(response, &args.output.headers, out).await
    }

    pub(super) async fn show_rate_limit<W: Write>(&self, args: OutputArgs, out: &mut W) -> Result<()> {
        let pages = self.api.get(ApiRequest::new("/rate_limit"), Follow::Disabled, &self.ctx).await?;
        self.write_pages(pages, &args.headers, out).await
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;
    use clap::Parser;
    use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::cli::{Cli, Command};
    use crate::commands::tests::{runner, text};

    fn command(args: &[&str]) -> Command {
        let argv = std::iter::once("hubrest").chain(args.iter().copied());
        Cli::try_parse_from(argv)
            .expect("valid arguments")
            .command
            .expect("a command")
    }

    #[test]
    fn upload_url_template_is_stripped() {
        check!(
            upload_base("https://uploads.github.com/repos/octo/hello/releases/1/assets{?name,label}")
                == "https://uploads.github.com/repos/octo/hello/releases/1/assets"
        );
        check!(upload_base("/releases/1/assets") == "/releases/1/assets");
    }

    #[test]
    fn typed_options_become_query() {
        let cli = Cli::try_parse_from(["hubrest", "list-issues", "octo", "hello", "--state", "all", "--per-page", "50"])
            .expect("valid arguments");
        let Some(Command::ListIssues(args)) = cli.command else {
            panic!("expected list-issues");
        };
        let params = query(&args, &args.list).expect("params");
        check!(params.to_query_string() == "state=all&per_page=50");
    }

    #[tokio::test]
    async fn list_repos_follows_every_page() {
        let server = MockServer::start().await;
        let next = format!("<{}/users/octo/repos?type=owner&page=2>; rel=\"next\"", server.uri());
        Mock::given(method("GET"))
            .and(path("/users/octo/repos"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[\"b\"]"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/octo/repos"))
            .and(query_param("type", "owner"))
            .respond_with(ResponseTemplate::new(200).insert_header("Link", next.as_str()).set_body_string("[\"a\"]"))
            .mount(&server)
            .await;

        let mut out = Vec::new();
        runner(&server)
            .run(command(&["list-repos", "octo", "--type", "owner"]), &mut out)
            .await
            .expect("listed");
        check!(text(&out) == "[\"a\"][\"b\"]");
    }

    #[tokio::test]
    async fn create_issue_posts_typed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/octo/hello/issues"))
            .and(body_json(serde_json::json!({
                "title": "Crash",
                "body": "Steps:\n1. start",
                "labels": ["bug"]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_string("{\"number\":7}"))
            .expect(1)
            .mount(&server)
            .await;

        let mut out = Vec::new();
        runner(&server)
            .run(
                command(&["create-issue", "octo", "hello", "Crash", "--body", "Steps:\n1. start", "--label", "bug"]),
                &mut out,
            )
            .await
            .expect("created");
        check!(text(&out) == "{\"number\":7}");
    }

    #[tokio::test]
    async fn delete_release_with_confirmation_bypass() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/repos/octo/hello/releases/42"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        runner(&server)
            .run(command(&["delete-release", "octo", "hello", "42"]), &mut Vec::new())
            .await
            .expect("deleted");
    }

    #[tokio::test]
    async fn upload_asset_infers_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/octo/hello/releases/1/assets"))
            .and(query_param("name", "notes.txt"))
            .and(header("Content-Type", "text/plain"))
            .and(body_string("release notes"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let file = std::env::temp_dir().join(format!("hubrest-upload-{}", std::process::id())).join("notes.txt");
        std::fs::create_dir_all(file.parent().expect("parent")).expect("temp dir");
        std::fs::File::create(&file)
            .and_then(|mut f| f.write_all(b"release notes"))
            .expect("asset file");

        let upload_url = format!("{}/repos/octo/hello/releases/1/assets{{?name,label}}", server.uri());
        let result = runner(&server)
            .run(
                command(&["upload-asset", &upload_url, file.to_str().expect("utf-8 path")]),
                &mut Vec::new(),
            )
            .await;
        std::fs::remove_file(&file).ok();

        result.expect("uploaded");
    }

    #[tokio::test]
    async fn rate_limit_reports_counters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rate_limit"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-RateLimit-Limit", "60")
                    .insert_header("X-RateLimit-Remaining", "59")
                    .set_body_string("{}"),
            )
            .mount(&server)
            .await;

        let runner = runner(&server);
        runner
            .run(command(&["rate-limit"]), &mut Vec::new())
            .await
            .expect("rate limit");
        let rate_limit = runner.rate_limit().expect("counters");
        check!(rate_limit.limit == Some(60));
        check!(rate_limit.remaining == Some(59));
    }
}
