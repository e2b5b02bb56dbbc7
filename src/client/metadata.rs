//! Session information commands: CAPABILITIES, HELP, DATE, NEWGROUPS, NEWNEWS

use chrono::{DateTime, Utc};
use tokio::io::{AsyncRead, AsyncWrite};

use super::NntpClient;
use crate::error::{NntpError, Result};
use crate::parse;
use crate::response::codes;
use crate::types::Newsgroup;

fn timestamp_args(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y%m%d %H%M%S GMT").to_string()
}

impl<S: AsyncRead + AsyncWrite + Unpin> NntpClient<S> {
    /// CAPABILITIES command (RFC 3977 Section 5.2)
    ///
    /// Not all servers implement it despite the RFC requiring it, so expect
    /// `Permanent` errors from older deployments.
    pub async fn capabilities(&mut self, keyword: Option<&str>) -> Result<Vec<String>> {
        let (code, message) = self.command("CAPABILITIES", keyword).await?;
        if code != codes::CAPABILITY_LIST {
            return Err(NntpError::reply(code, message));
        }

        let mut reader = self.info(code, &message, false);
        let mut capabilities = Vec::new();
        while let Some(line) = reader.next_line().await? {
            capabilities.push(line.trim().to_string());
        }
        Ok(capabilities)
    }

    /// HELP command (RFC 3977 Section 7.2)
    ///
    /// Returns the server's help text verbatim.
    pub async fn help(&mut self) -> Result<String> {
        let (code, message) = self.command("HELP", None).await?;
        if code != codes::HELP_TEXT_FOLLOWS {
            return Err(NntpError::reply(code, message));
        }

        let mut reader = self.info(code, &message, false);
        let mut text = String::new();
        while let Some(line) = reader.next_line().await? {
            text.push_str(&line);
        }
        Ok(text)
    }

    /// DATE command (RFC 3977 Section 7.1)
    ///
    /// Coordinated universal time from the server's perspective; useful as a
    /// reference point for NEWNEWS.
    pub async fn date(&mut self) -> Result<DateTime<Utc>> {
        let (code, message) = self.command("DATE", None).await?;
        if code != codes::SERVER_DATE {
            return Err(NntpError::reply(code, message));
        }
        parse::parse_date(&message)
    }

    /// NEWGROUPS command (RFC 3977 Section 7.3)
    ///
    /// Newsgroups created on the server since the given timestamp.
    pub async fn newgroups(&mut self, since: DateTime<Utc>) -> Result<Vec<Newsgroup>> {
        let args = timestamp_args(since);
        let (code, message) = self.command("NEWGROUPS", Some(&args)).await?;
        if code != codes::NEW_NEWSGROUPS_FOLLOW {
            return Err(NntpError::reply(code, message));
        }

        let mut reader = self.info(code, &message, false);
        let mut groups = Vec::new();
        while let Some(line) = reader.next_line().await? {
            groups.push(parse::parse_newsgroup(&line)?);
        }
        Ok(groups)
    }

    /// NEWNEWS command (RFC 3977 Section 7.4)
    ///
    /// Message-ids of articles posted since the given timestamp to groups
    /// matching the glob pattern.
    pub async fn newnews(
        &mut self,
        pattern: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<String>> {
        let args = format!("{pattern} {}", timestamp_args(since));
        let (code, message) = self.command("NEWNEWS", Some(&args)).await?;
        if code != codes::NEW_ARTICLE_LIST_FOLLOWS {
            return Err(NntpError::reply(code, message));
        }

        let mut reader = self.info(code, &message, false);
        let mut ids = Vec::new();
        while let Some(line) = reader.next_line().await? {
            ids.push(line.trim().to_string());
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_args_format() {
        let ts = Utc.with_ymd_and_hms(2023, 8, 1, 12, 5, 34).unwrap();
        assert_eq!(timestamp_args(ts), "20230801 120534 GMT");
    }
}
