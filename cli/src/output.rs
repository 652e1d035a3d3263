//! Output contract.
//!
//! Requested header values come first, one per line and blank when absent,
//! then the raw response body. Scripts read this positionally.

use std::io::{self, Write};

use hubrest::{Body, Headers, RateLimit, Response, Result};

/// Write the values of `names`, in order.
pub fn write_headers<W: Write>(out: &mut W, headers: &Headers, names: &[String]) -> io::Result<()> {
    for value in headers.select(names) {
        writeln!(out, "{value}")?;
    }
    Ok(())
}

/// Copy a body as it arrives.
pub async fn write_body<W: Write>(out: &mut W, mut body: Body) -> Result<()> {
    while let Some(chunk) = body.next_chunk().await.transpose()? {
        out.write_all(&chunk)?;
    }
    out.flush()?;
    Ok(())
}

/// Selected headers followed by the body of `response`.
pub async fn write_response<W: Write>(out: &mut W, response: Response, names: &[String]) -> Result<()> {
    write_headers(out, response.headers(), names)?;
    write_body(out, response.into_body()).await
}

/// `Rate limit remaining: N (resets in S seconds)`, nothing when unknown.
pub fn write_rate_limit<W: Write>(out: &mut W, rate_limit: &RateLimit) -> io::Result<()> {
    match (rate_limit.remaining, rate_limit.reset_in) {
        (Some(remaining), Some(reset_in)) => {
            writeln!(out, "Rate limit remaining: {remaining} (resets in {reset_in} seconds)")
        }
        (Some(remaining), None) => writeln!(out, "Rate limit remaining: {remaining}"),
        (None, _) => Ok(()),
    }
}
