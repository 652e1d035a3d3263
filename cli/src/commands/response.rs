//! `response`: parse a raw HTTP response, such as `curl -si` output.

use std::io::Write;
use std::time::SystemTime;

use hubrest::{Error, Result, parse_response};
use tokio::io::AsyncBufRead;

use super::Runner;
use crate::cli::ResponseArgs;

impl<C> Runner<C> {
    /// Status errors are reported like a live request, without the body.
    pub(super) async fn response<R, W>(&self, args: ResponseArgs, reader: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
        W: Write,
    {
        let response = parse_response(reader).await?.normalize(SystemTime::now());
        if response.status() >= 400 {
            return Err(Error::from_response(&response));
        }
        self.write_response(response, &args.headers, out).await
    }
}
