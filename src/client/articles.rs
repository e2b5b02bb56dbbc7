//! ARTICLE, HEAD, and BODY with transparent yEnc body decoding

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::trace;

use super::NntpClient;
use super::info::InfoReader;
use crate::error::{NntpError, Result};
use crate::headers::{Headers, parse_headers};
use crate::response::codes;
use crate::types::ArticleRef;
use crate::yenc::YencDecoder;

impl<S: AsyncRead + AsyncWrite + Unpin> InfoReader<'_, S> {
    /// Consume header lines through the blank separator and parse them
    pub(super) async fn read_headers(&mut self) -> Result<Headers> {
        let mut lines = Vec::new();
        while let Some(line) = self.next_line().await? {
            if line == "\r\n" {
                break;
            }
            lines.push(line);
        }
        parse_headers(lines.iter().map(String::as_str))
    }

    /// Consume the remaining lines as an article body.
    ///
    /// `decode` forces yEnc decoding on or off; `None` sniffs: a first
    /// non-blank line starting with `=y` enables decoding (discarding any
    /// blank prefix), any other content locks it off. While decoding, `=y`
    /// header/trailer lines are skipped and the rest stream through a fresh
    /// yEnc decoder.
    pub(super) async fn read_body(&mut self, mut decode: Option<bool>) -> Result<Vec<u8>> {
        let mut decoder = YencDecoder::new();
        let mut body = Vec::new();
        while let Some(line) = self.next_raw().await? {
            if decode.is_none() {
                if line.starts_with(b"=y") {
                    trace!("yEnc body detected");
                    decode = Some(true);
                    body.clear();
                } else if line != b"\r\n" {
                    decode = Some(false);
                }
            }
            if decode == Some(true) {
                if line.starts_with(b"=y") {
                    continue;
                }
                body.extend_from_slice(&decoder.decode(&line));
            } else {
                body.extend_from_slice(&line);
            }
        }
        Ok(body)
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> NntpClient<S> {
    /// ARTICLE command (RFC 3977 Section 6.2.1)
    ///
    /// Fetches headers and body of the selected article (`None` uses the
    /// current article). Headers are decoded to strings; the body stays raw
    /// bytes. `decode` forces yEnc decoding on or off; with `None` it is
    /// enabled automatically when the Subject mentions yEnc or the body
    /// opens with a `=ybegin` line.
    pub async fn article(
        &mut self,
        article: Option<ArticleRef>,
        decode: Option<bool>,
    ) -> Result<(u64, Headers, Vec<u8>)> {
        let args = article.map(|a| a.to_string());
        let (code, message) = self.command("ARTICLE", args.as_deref()).await?;
        if code != codes::ARTICLE_FOLLOWS {
            return Err(NntpError::reply(code, message));
        }

        let articleno: u64 = message
            .split_whitespace()
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| NntpError::Protocol(message.clone()))?;

        let mut reader = self.info(code, &message, false);
        let headers = reader.read_headers().await?;

        let mut decode = decode;
        if decode.is_none() && headers.get("subject").is_some_and(|s| s.contains("yEnc")) {
            decode = Some(true);
        }

        let body = reader.read_body(decode).await?;
        Ok((articleno, headers, body))
    }

    /// HEAD command (RFC 3977 Section 6.2.2)
    ///
    /// Like ARTICLE but only the headers are returned.
    pub async fn head(&mut self, article: Option<ArticleRef>) -> Result<Headers> {
        let args = article.map(|a| a.to_string());
        let (code, message) = self.command("HEAD", args.as_deref()).await?;
        if code != codes::HEAD_FOLLOWS {
            return Err(NntpError::reply(code, message));
        }

        let mut reader = self.info(code, &message, false);
        let headers = reader.read_headers().await?;
        reader.drain().await?;
        Ok(headers)
    }

    /// BODY command (RFC 3977 Section 6.2.3)
    ///
    /// Like ARTICLE but only the body is returned. See
    /// [`article`](Self::article) for the `decode` semantics.
    pub async fn body(
        &mut self,
        article: Option<ArticleRef>,
        decode: Option<bool>,
    ) -> Result<Vec<u8>> {
        let args = article.map(|a| a.to_string());
        let (code, message) = self.command("BODY", args.as_deref()).await?;
        if code != codes::BODY_FOLLOWS {
            return Err(NntpError::reply(code, message));
        }

        let mut reader = self.info(code, &message, false);
        reader.read_body(decode).await
    }
}
