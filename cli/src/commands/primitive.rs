//! `get`, `post`, `put`, `patch` and `delete`.

use std::io::Write;

use hubrest::{ApiRequest, HttpClient, Method, Params, Payload, Result};
use tokio::io::AsyncReadExt;

use super::Runner;
use crate::cli::{DeleteArgs, GetArgs, SendArgs};

impl<C: HttpClient + Clone + 'static> Runner<C> {
    pub(super) async fn get<W: Write>(&self, args: GetArgs, out: &mut W) -> Result<()> {
        let follow = args.follow();
        let params = Params::parse(&args.params)?;

        let mut request = ApiRequest::new(args.path).query(&params);
        if let Some(etag) = args.etag {
            request = request.etag(etag);
        }

        let pages = self.api.get(request, follow, &self.ctx).await?;
        self.write_pages(pages, &args.output.headers, out).await
    }

    pub(super) async fn send<W: Write>(
        &self,
        method: Method,
        args: SendArgs,
        out: &mut W,
    ) -> Result<()> {
        let payload = if let Some(file) = args.file {
            Payload::file(file)
        } else if args.params == ["-"] {
            let mut bytes = Vec::new();
            tokio::io::stdin().read_to_end(&mut bytes).await?;
            Payload::raw(bytes)
        } else {
            Payload::params(&Params::parse(&args.params)?)
        };
        let payload = match args.content_type {
            Some(content_type) => payload.with_content_type(content_type),
            None => payload,
        };

        let request = ApiRequest::new(args.path).method(method).payload(payload);
        let response = match method {
            Method::Put => self.api.put(request, &self.ctx).await?,
            Method::Patch => self.api.patch(request, &self.ctx).await?,
            _ => self.api.post(request, &self.ctx).await?,
        };
        self.write_response(response, &args.output.headers, out).await
    }

    pub(super) async fn delete<W: Write>(&self, args: DeleteArgs, out: &mut W) -> Result<()> {
        self.confirm(&format!("Delete {}?", args.path))?;

        let response = self.api.delete(ApiRequest::new(args.path), &self.ctx).await?;
        self.write_response(response, &args.output.headers, out).await
    }
}
