//! Group selection and article navigation: GROUP, NEXT, LAST

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use super::NntpClient;
use crate::error::{NntpError, Result};
use crate::response::codes;

fn parse_stat(message: &str, verb: &str) -> Result<(u64, String)> {
    let mut parts = message.split_whitespace();
    match (parts.next().and_then(|s| s.parse().ok()), parts.next()) {
        (Some(articleno), Some(msgid)) => Ok((articleno, msgid.to_string())),
        _ => Err(NntpError::data(format!("Invalid {verb} status"))),
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> NntpClient<S> {
    /// GROUP command (RFC 3977 Section 6.1.1)
    ///
    /// Selects a newsgroup and returns `(estimated total, first, last,
    /// name)`.
    pub async fn group(&mut self, name: &str) -> Result<(u64, u64, u64, String)> {
        debug!("selecting newsgroup {}", name);
        let (code, message) = self.command("GROUP", Some(name)).await?;
        if code != codes::GROUP_SELECTED {
            return Err(NntpError::reply(code, message));
        }

        let mut parts = message.split_whitespace();
        let numbers: Vec<Option<u64>> = (0..3).map(|_| parts.next().and_then(|s| s.parse().ok())).collect();
        match (numbers[0], numbers[1], numbers[2], parts.next()) {
            (Some(total), Some(first), Some(last), Some(group)) => {
                debug!("group {}: {} articles ({}-{})", group, total, first, last);
                Ok((total, first, last, group.to_string()))
            }
            _ => Err(NntpError::data(format!("Invalid GROUP status {message:?}"))),
        }
    }

    /// NEXT command (RFC 3977 Section 6.1.4)
    ///
    /// Advances the current article pointer; returns `(articleno, msgid)`.
    pub async fn next(&mut self) -> Result<(u64, String)> {
        let (code, message) = self.command("NEXT", None).await?;
        if code != codes::ARTICLE_STAT {
            return Err(NntpError::reply(code, message));
        }
        let (articleno, msgid) = parse_stat(&message, "NEXT")?;
        debug!("advanced to article {} {}", articleno, msgid);
        Ok((articleno, msgid))
    }

    /// LAST command (RFC 3977 Section 6.1.3)
    ///
    /// Moves the current article pointer back; returns `(articleno, msgid)`.
    pub async fn last(&mut self) -> Result<(u64, String)> {
        let (code, message) = self.command("LAST", None).await?;
        if code != codes::ARTICLE_STAT {
            return Err(NntpError::reply(code, message));
        }
        let (articleno, msgid) = parse_stat(&message, "LAST")?;
        debug!("moved back to article {} {}", articleno, msgid);
        Ok((articleno, msgid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stat() {
        let (articleno, msgid) = parse_stat("3000234 <45223423@example.com> ok", "NEXT").unwrap();
        assert_eq!(articleno, 3000234);
        assert_eq!(msgid, "<45223423@example.com>");
    }

    #[test]
    fn test_parse_stat_invalid() {
        assert!(parse_stat("", "NEXT").is_err());
        assert!(parse_stat("nonsense", "LAST").is_err());
        assert!(parse_stat("123", "NEXT").is_err());
    }
}
