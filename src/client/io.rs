//! Low-level I/O and the command/status engine
//!
//! Everything here is byte-accurate protocol plumbing: transport reads feed
//! the line buffer, the status parser classifies reply codes, and `command`
//! sequences one request/response exchange including the lazy AUTHINFO dance
//! triggered by a 480 reply.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tracing::{debug, trace};

use super::NntpClient;
use crate::error::{NntpError, Result};
use crate::response::codes;

/// Transport read chunk size
const RECV_SIZE: usize = 16 * 1024;

fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

impl<S: AsyncRead + AsyncWrite + Unpin> NntpClient<S> {
    /// Pull one transport chunk into the receive buffer.
    ///
    /// A zero-byte read means the remote closed mid-response, which is fatal
    /// to the connection.
    pub(super) async fn recv(&mut self) -> Result<()> {
        let mut chunk = [0u8; RECV_SIZE];
        let n = timeout(self.timeout, self.stream.read(&mut chunk))
            .await
            .map_err(|_| NntpError::Timeout)??;
        if n == 0 {
            return Err(NntpError::ConnectionClosed);
        }
        trace!("recv {} bytes", n);
        self.buffer.write(&chunk[..n]);
        Ok(())
    }

    /// Read one CRLF-terminated line, drawing from the transport as needed
    pub(super) async fn read_line(&mut self) -> Result<Vec<u8>> {
        loop {
            if let Some(line) = self.buffer.readline() {
                return Ok(line);
            }
            self.recv().await?;
        }
    }

    /// Read whatever is available: the buffered remainder, or one fresh
    /// transport chunk. Used by the gzip reader, which consumes raw bytes
    /// rather than lines.
    pub(super) async fn read_chunk(&mut self) -> Result<Vec<u8>> {
        loop {
            let data = self.buffer.read(0);
            if !data.is_empty() {
                return Ok(data);
            }
            self.recv().await?;
        }
    }

    /// Write raw bytes to the transport
    pub(super) async fn send(&mut self, data: &[u8]) -> Result<()> {
        timeout(self.timeout, async {
            self.stream.write_all(data).await?;
            self.stream.flush().await
        })
        .await
        .map_err(|_| NntpError::Timeout)??;
        Ok(())
    }

    /// Read and parse one status line
    ///
    /// The line is split on the first whitespace run into a numeric code and
    /// a free-form message (empty when the server sent none).
    ///
    /// # Errors
    ///
    /// - [`NntpError::Protocol`] when the code is not an integer in [100,600)
    /// - [`NntpError::Temporary`] for 4xx codes
    /// - [`NntpError::Permanent`] for 5xx codes
    pub async fn status(&mut self) -> Result<(u16, String)> {
        let line = self.read_line().await?;
        let line = rstrip(&line);
        trace!("status: {}", String::from_utf8_lossy(line));

        let split = line
            .iter()
            .position(u8::is_ascii_whitespace)
            .unwrap_or(line.len());
        let (code_part, rest) = line.split_at(split);

        let code: u16 = std::str::from_utf8(code_part)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| NntpError::Protocol(decode_lossy(line)))?;
        if !(100..600).contains(&code) {
            return Err(NntpError::Protocol(decode_lossy(line)));
        }

        let message = decode_lossy(trim_leading_ws(rest));

        match code {
            400..=499 => Err(NntpError::Temporary { code, message }),
            500..=599 => Err(NntpError::Permanent { code, message }),
            _ => Ok((code, message)),
        }
    }

    /// Issue a command and read its status reply
    ///
    /// If the server answers 480 the AUTHINFO USER/PASS exchange runs with
    /// the configured credentials and the original command is retried exactly
    /// once. Any non-281 outcome of that exchange is a
    /// [`NntpError::Reply`]; 4xx/5xx replies to the AUTHINFO commands
    /// themselves surface as status errors.
    ///
    /// # Errors
    ///
    /// [`NntpError::Sync`] if a multi-line reader is still outstanding.
    pub async fn command(&mut self, verb: &str, args: Option<&str>) -> Result<(u16, String)> {
        if self.generating {
            return Err(NntpError::Sync);
        }

        let cmd = match args {
            Some(args) => format!("{verb} {args}\r\n"),
            None => format!("{verb}\r\n"),
        };

        trace!("send: {}", cmd.trim_end());
        self.send(cmd.as_bytes()).await?;

        match self.status().await {
            Err(NntpError::Temporary { code: 480, .. }) => {
                self.authenticate().await?;
                trace!("send (retry): {}", cmd.trim_end());
                self.send(cmd.as_bytes()).await?;
                self.status().await
            }
            result => result,
        }
    }

    /// AUTHINFO USER/PASS exchange with the configured credentials.
    /// Accepts only a final 281.
    async fn authenticate(&mut self) -> Result<()> {
        debug!("authenticating as {}", self.config.username);

        let user_cmd = format!("AUTHINFO USER {}\r\n", self.config.username);
        self.send(user_cmd.as_bytes()).await?;
        let (mut code, mut message) = self.status().await?;

        if code == codes::AUTH_CONTINUE {
            let pass_cmd = format!("AUTHINFO PASS {}\r\n", self.config.password);
            self.send(pass_cmd.as_bytes()).await?;
            (code, message) = self.status().await?;
        }

        if code != codes::AUTH_ACCEPTED {
            return Err(NntpError::reply(code, message));
        }

        debug!("authentication accepted");
        Ok(())
    }
}

/// Strip trailing ASCII whitespace
pub(super) fn rstrip(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    &line[..end]
}

fn trim_leading_ws(line: &[u8]) -> &[u8] {
    let start = line
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(line.len());
    &line[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rstrip() {
        assert_eq!(rstrip(b"200 ok\r\n"), b"200 ok");
        assert_eq!(rstrip(b"200 ok  \r\n"), b"200 ok");
        assert_eq!(rstrip(b"\r\n"), b"");
        assert_eq!(rstrip(b"200"), b"200");
    }

    #[test]
    fn test_trim_leading_ws() {
        assert_eq!(trim_leading_ws(b"  message"), b"message");
        assert_eq!(trim_leading_ws(b"message"), b"message");
        assert_eq!(trim_leading_ws(b"   "), b"");
    }
}
