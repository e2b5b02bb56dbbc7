//! Overview and header range commands: XOVER/XZVER, HDR/XHDR/XZHDR, XPAT
//!
//! These are the high-volume range commands the compression extensions exist
//! for. The overview and header variants return lazy streams so a range of
//! hundreds of thousands of articles can be consumed without buffering the
//! whole response.

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, trace};

use super::NntpClient;
use super::info::InfoReader;
use crate::error::{NntpError, Result};
use crate::headers::Headers;
use crate::response::codes;
use crate::types::{MessageSpec, OverviewField, Range};

/// Strip the `Name: ` prefix a `full` overview field repeats in its value
fn strip_full_prefix<'v>(field: &OverviewField, value: &'v str) -> &'v str {
    if !field.full {
        return value;
    }
    let n = field.name.len();
    match (value.get(..n), value.get(n..)) {
        (Some(head), Some(rest))
            if head.eq_ignore_ascii_case(&field.name) && rest.starts_with(':') =>
        {
            let rest = &rest[1..];
            rest.strip_prefix(' ').unwrap_or(rest)
        }
        _ => value,
    }
}

/// Lazy stream of `(articleno, overview)` pairs from XOVER/XZVER
pub struct Overviews<'a, S> {
    reader: InfoReader<'a, S>,
    fmt: Vec<OverviewField>,
    verb: &'static str,
}

impl<S: AsyncRead + AsyncWrite + Unpin> Overviews<'_, S> {
    /// Next overview entry, or `None` at the end of the response
    pub async fn next(&mut self) -> Result<Option<(u64, Headers)>> {
        let Some(line) = self.reader.next_line().await? else {
            return Ok(None);
        };
        let line = line.trim_end();
        let mut parts = line.split('\t');
        let articleno: u64 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| NntpError::data(format!("Invalid {} response", self.verb)))?;
        let overview = self
            .fmt
            .iter()
            .zip(parts)
            .map(|(field, value)| (field.name.clone(), strip_full_prefix(field, value).to_string()))
            .collect();
        trace!("overview entry for article {}", articleno);
        Ok(Some((articleno, overview)))
    }

    /// Collect the remaining entries
    pub async fn collect(mut self) -> Result<Vec<(u64, Headers)>> {
        let mut entries = Vec::new();
        while let Some(entry) = self.next().await? {
            entries.push(entry);
        }
        debug!("{} returned {} entries", self.verb, entries.len());
        Ok(entries)
    }
}

/// Lazy stream of `(articleno, value)` pairs from HDR/XHDR/XZHDR
pub struct HeaderValues<'a, S> {
    reader: InfoReader<'a, S>,
    verb: &'static str,
}

impl<S: AsyncRead + AsyncWrite + Unpin> HeaderValues<'_, S> {
    /// Next header entry, or `None` at the end of the response
    pub async fn next(&mut self) -> Result<Option<(u64, String)>> {
        let Some(line) = self.reader.next_line().await? else {
            return Ok(None);
        };
        let line = line.trim_end();
        let (articleno, value) = match line.split_once(char::is_whitespace) {
            Some((n, value)) => (n, value.trim_start()),
            None => (line, ""),
        };
        let articleno: u64 = articleno
            .parse()
            .map_err(|_| NntpError::data(format!("Invalid {} response", self.verb)))?;
        trace!("header value for article {}", articleno);
        Ok(Some((articleno, value.to_string())))
    }

    /// Collect the remaining entries
    pub async fn collect(mut self) -> Result<Vec<(u64, String)>> {
        let mut entries = Vec::new();
        while let Some(entry) = self.next().await? {
            entries.push(entry);
        }
        debug!("{} returned {} entries", self.verb, entries.len());
        Ok(entries)
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> NntpClient<S> {
    async fn over_stream(
        &mut self,
        range: Option<Range>,
        verb: &'static str,
    ) -> Result<Overviews<'_, S>> {
        // Resolve the field layout before the range command goes out; no
        // command may be issued once the reader is live.
        let fmt = self.overview_fmt().await?;

        let args = range.map(|r| r.to_string());
        debug!(
            "{} {}",
            verb,
            args.as_deref().unwrap_or("(current article)")
        );
        let (code, message) = self.command(verb, args.as_deref()).await?;
        if code != codes::OVERVIEW_INFO_FOLLOWS {
            return Err(NntpError::reply(code, message));
        }

        let yz = verb == "XZVER";
        Ok(Overviews {
            reader: self.info(code, &message, yz),
            fmt,
            verb,
        })
    }

    /// XOVER command (RFC 2980 Section 2.8)
    ///
    /// Overview database entries for the given article range (`None` uses
    /// the current article). Values are labeled with the server's overview
    /// format.
    pub async fn xover(&mut self, range: Option<Range>) -> Result<Overviews<'_, S>> {
        self.over_stream(range, "XOVER").await
    }

    /// XZVER command
    ///
    /// The compressed variant of XOVER: the response body is a yEnc-wrapped
    /// deflate stream, decoded and CRC-checked transparently.
    pub async fn xzver(&mut self, range: Option<Range>) -> Result<Overviews<'_, S>> {
        self.over_stream(range, "XZVER").await
    }

    async fn hdr_stream(
        &mut self,
        field: &str,
        spec: Option<MessageSpec>,
        verb: &'static str,
    ) -> Result<HeaderValues<'_, S>> {
        let args = match spec {
            Some(spec) => format!("{field} {spec}"),
            None => field.to_string(),
        };
        debug!("{} {}", verb, args);
        let (code, message) = self.command(verb, Some(&args)).await?;
        if code != codes::HEAD_FOLLOWS {
            return Err(NntpError::reply(code, message));
        }

        let yz = verb == "XZHDR";
        Ok(HeaderValues {
            reader: self.info(code, &message, yz),
            verb,
        })
    }

    /// HDR command (RFC 3977 Section 8.5)
    ///
    /// One header field for each article in the range.
    pub async fn hdr(
        &mut self,
        field: &str,
        spec: Option<MessageSpec>,
    ) -> Result<HeaderValues<'_, S>> {
        self.hdr_stream(field, spec, "HDR").await
    }

    /// XHDR command (RFC 2980 Section 2.6)
    pub async fn xhdr(
        &mut self,
        field: &str,
        spec: Option<MessageSpec>,
    ) -> Result<HeaderValues<'_, S>> {
        self.hdr_stream(field, spec, "XHDR").await
    }

    /// XZHDR command
    ///
    /// The compressed variant of XHDR; see [`xzver`](Self::xzver).
    pub async fn xzhdr(
        &mut self,
        field: &str,
        spec: Option<MessageSpec>,
    ) -> Result<HeaderValues<'_, S>> {
        self.hdr_stream(field, spec, "XZHDR").await
    }

    /// XPAT command (RFC 2980 Section 2.9)
    ///
    /// Header values matching glob patterns over the given articles.
    pub async fn xpat(
        &mut self,
        field: &str,
        spec: MessageSpec,
        patterns: &[&str],
    ) -> Result<Vec<String>> {
        let mut args = format!("{field} {spec}");
        for pattern in patterns {
            args.push(' ');
            args.push_str(pattern);
        }
        debug!("XPAT {}", args);
        let (code, message) = self.command("XPAT", Some(&args)).await?;
        if code != codes::HEAD_FOLLOWS {
            return Err(NntpError::reply(code, message));
        }

        let mut reader = self.info(code, &message, false);
        let mut lines = Vec::new();
        while let Some(line) = reader.next_line().await? {
            lines.push(line.trim().to_string());
        }
        debug!("XPAT matched {} lines", lines.len());
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, full: bool) -> OverviewField {
        OverviewField {
            name: name.to_string(),
            full,
        }
    }

    #[test]
    fn test_strip_full_prefix() {
        let xref = field("Xref", true);
        assert_eq!(
            strip_full_prefix(&xref, "Xref: news.example.com misc.test:3000363"),
            "news.example.com misc.test:3000363"
        );
        assert_eq!(
            strip_full_prefix(&xref, "xref: lowercased"),
            "lowercased"
        );
        // No prefix on the wire: value passes through
        assert_eq!(strip_full_prefix(&xref, "bare value"), "bare value");
    }

    #[test]
    fn test_strip_full_prefix_not_full() {
        let subject = field("Subject", false);
        assert_eq!(
            strip_full_prefix(&subject, "Subject: looks prefixed"),
            "Subject: looks prefixed"
        );
    }

    #[test]
    fn test_strip_full_prefix_short_value() {
        let xref = field("Xref", true);
        assert_eq!(strip_full_prefix(&xref, "Xr"), "Xr");
        assert_eq!(strip_full_prefix(&xref, ""), "");
    }
}
