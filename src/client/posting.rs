//! POST command with dot-stuffing and illegal-character truncation

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use super::NntpClient;
use crate::error::{NntpError, Result};
use crate::headers::{Headers, unparse_headers};
use crate::response::codes;

/// Strip one trailing `\r\n` or `\n` from a body line
fn strip_eol(line: &[u8]) -> &[u8] {
    if let Some(stripped) = line.strip_suffix(b"\r\n") {
        stripped
    } else if let Some(stripped) = line.strip_suffix(b"\n") {
        stripped
    } else {
        line
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> NntpClient<S> {
    /// POST command (RFC 3977 Section 6.3.1)
    ///
    /// Two phases: POST, then on 340 the headers, a blank line, the
    /// dot-stuffed body, and the lone-dot terminator. `\n` and `\r\n` line
    /// endings in `body` are both normalized to CRLF on the wire.
    ///
    /// Returns the message-id when the server's 240 reply carries one.
    ///
    /// # Errors
    ///
    /// A body line with an embedded NUL or bare CR cannot be represented on
    /// the wire. The post is truncated before the offending line, the
    /// terminator is still sent and the final status read, then
    /// [`NntpError::Data`] (`"Illegal characters found"`) is raised
    /// regardless of that status.
    pub async fn post(&mut self, headers: &Headers, body: &[u8]) -> Result<Option<String>> {
        let (code, message) = self.command("POST", None).await?;
        if code != codes::SEND_ARTICLE {
            return Err(NntpError::reply(code, message));
        }

        self.send(unparse_headers(headers).as_bytes()).await?;

        let mut illegal = false;
        for line in body.split_inclusive(|&b| b == b'\n') {
            let content = strip_eol(line);
            if content.iter().any(|&b| b == 0 || b == b'\r') {
                illegal = true;
                break;
            }
            let mut wire = Vec::with_capacity(content.len() + 3);
            if content.first() == Some(&b'.') {
                wire.push(b'.');
            }
            wire.extend_from_slice(content);
            wire.extend_from_slice(b"\r\n");
            self.send(&wire).await?;
        }
        self.send(b".\r\n").await?;

        let status = self.status().await;

        if illegal {
            debug!("post body truncated at illegal characters");
            return Err(NntpError::data("Illegal characters found"));
        }

        let (code, message) = status?;
        if code != codes::ARTICLE_POSTED {
            return Err(NntpError::reply(code, message));
        }

        // Not in any RFC, but servers commonly echo the message-id in the
        // 240 reply.
        let message_id = message
            .split_whitespace()
            .next()
            .filter(|id| id.starts_with('<') && id.ends_with('>'))
            .map(str::to_string);
        Ok(message_id)
    }
}
