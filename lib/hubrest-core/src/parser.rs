//! Raw HTTP response parsing.
//!
//! Reads a response as it appears on the wire (or as `curl -i` prints it):
//! a status line, `Name: Value` header lines up to the first blank line, then
//! the body. Only the head is read eagerly; the body is handed back as a
//! stream over the rest of the reader.
//!
//! Interim `100 Continue` blocks that precede the final response are skipped.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::trace;

use crate::{Body, Error, Headers, Response, Result};

/// Parsed status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Protocol version, e.g. `HTTP/1.1` or `HTTP/2`.
    pub version: String,
    /// Three-digit status code.
    pub status: u16,
    /// Reason phrase, possibly empty.
    pub text: String,
}

impl StatusLine {
    /// Parse `<version> <code> <text...>`.
    ///
    /// The code is the three characters right after the first space.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if there is no space or the code is not three digits.
    pub fn parse(line: &str) -> Result<Self> {
        let (version, rest) = line
            .split_once(' ')
            .ok_or_else(|| Error::parse(format!("malformed status line '{line}'")))?;

        let code = rest
            .get(..3)
            .filter(|code| code.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| Error::parse(format!("malformed status code in '{line}'")))?;
        let status = code
            .parse()
            .map_err(|_| Error::parse(format!("malformed status code in '{line}'")))?;

        let text = rest.get(3..).unwrap_or_default();
        if !text.is_empty() && !text.starts_with(' ') {
            return Err(Error::parse(format!("malformed status code in '{line}'")));
        }

        Ok(Self {
            version: version.to_string(),
            status,
            text: text.trim().to_string(),
        })
    }

    const fn is_continue(&self) -> bool {
        self.status == 100
    }
}

/// Parse a raw HTTP response.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the stream is empty, the status line is
/// malformed or a header line has no `:`; [`Error::Io`] if reading fails.
pub async fn parse_response<R>(mut reader: R) -> Result<Response>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let status_line = loop {
        let line = read_line(&mut reader)
            .await?
            .ok_or_else(|| Error::parse("missing status line"))?;
        let status_line = StatusLine::parse(&line)?;
        trace!(line = %line, "status line");

        if !status_line.is_continue() {
            break status_line;
        }
        // Skip the interim block up to its blank line.
        while let Some(line) = read_line(&mut reader).await? {
            if line.is_empty() {
                break;
            }
        }
    };

    let headers = read_headers(&mut reader).await?;

    Ok(Response::new(
        status_line.version,
        status_line.status,
        status_line.text,
        headers,
        Body::from_reader(reader),
    ))
}

/// Read header lines up to the first blank line or the end of the stream.
async fn read_headers<R>(reader: &mut R) -> Result<Headers>
where
    R: AsyncBufRead + Unpin,
{
    let mut headers = Headers::new();
    while let Some(line) = read_line(reader).await? {
        if line.is_empty() {
            break;
        }
        trace!(line = %line, "header");
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| Error::parse(format!("malformed header line '{line}'")))?;
        headers.insert(name.trim_end(), value.trim());
    }
    Ok(headers)
}

/// Next line without its `\n` and trailing `\r`; `None` at end of stream.
async fn read_line<R>(reader: &mut R) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf).await? == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    while buf.last() == Some(&b'\r') {
        buf.pop();
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}
