//! The LIST command family and the overview format cache

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use super::NntpClient;
use crate::error::{NntpError, Result};
use crate::parse;
use crate::response::codes;
use crate::types::{Newsgroup, OverviewField};
use chrono::{DateTime, Utc};

/// The seven overview fields every server must carry (RFC 2980), used when
/// LIST OVERVIEW.FMT is unavailable
const REQUIRED_OVERVIEW_FIELDS: [&str; 7] = [
    "Subject",
    "From",
    "Date",
    "Message-ID",
    "References",
    "Bytes",
    "Lines",
];

impl<S: AsyncRead + AsyncWrite + Unpin> NntpClient<S> {
    async fn list_lines(&mut self, verb: &str, args: Option<&str>) -> Result<Vec<String>> {
        let (code, message) = self.command(verb, args).await?;
        if code != codes::LIST_INFORMATION_FOLLOWS {
            return Err(NntpError::reply(code, message));
        }

        let mut reader = self.info(code, &message, false);
        let mut lines = Vec::new();
        while let Some(line) = reader.next_line().await? {
            lines.push(line);
        }
        Ok(lines)
    }

    /// LIST ACTIVE command (RFC 3977 Section 7.6.3)
    ///
    /// Active newsgroups matching the pattern; a bare `LIST` when no pattern
    /// is given.
    pub async fn list_active(&mut self, pattern: Option<&str>) -> Result<Vec<Newsgroup>> {
        let verb = if pattern.is_none() { "LIST" } else { "LIST ACTIVE" };
        self.list_lines(verb, pattern)
            .await?
            .iter()
            .map(|line| parse::parse_newsgroup(line))
            .collect()
    }

    /// LIST ACTIVE.TIMES command (RFC 3977 Section 7.6.4)
    ///
    /// Newsgroups with their creation time and creator.
    pub async fn list_active_times(
        &mut self,
    ) -> Result<Vec<(String, DateTime<Utc>, String)>> {
        let lines = self.list_lines("LIST ACTIVE.TIMES", None).await?;
        let mut entries = Vec::new();
        for line in lines {
            let mut parts = line.split_whitespace();
            let entry = match (parts.next(), parts.next(), parts.next()) {
                (Some(name), Some(epoch), Some(creator)) => (
                    name.to_string(),
                    parse::parse_epoch(epoch)
                        .map_err(|_| NntpError::data("Invalid LIST ACTIVE.TIMES"))?,
                    creator.to_string(),
                ),
                _ => return Err(NntpError::data("Invalid LIST ACTIVE.TIMES")),
            };
            entries.push(entry);
        }
        Ok(entries)
    }

    /// LIST NEWSGROUPS command (RFC 3977 Section 7.6.6)
    ///
    /// Group names with their one-line descriptions.
    pub async fn list_newsgroups(
        &mut self,
        pattern: Option<&str>,
    ) -> Result<Vec<(String, String)>> {
        let lines = self.list_lines("LIST NEWSGROUPS", pattern).await?;
        let mut entries = Vec::new();
        for line in lines {
            let line = line.trim();
            let (name, description) = match line.split_once(char::is_whitespace) {
                Some((name, description)) => (name, description.trim_start()),
                None => (line, ""),
            };
            if name.is_empty() {
                continue;
            }
            entries.push((name.to_string(), description.to_string()));
        }
        Ok(entries)
    }

    /// LIST OVERVIEW.FMT command (RFC 3977 Section 8.4)
    ///
    /// The ordered field layout of the server's overview database.
    pub async fn list_overview_fmt(&mut self) -> Result<Vec<OverviewField>> {
        self.list_lines("LIST OVERVIEW.FMT", None)
            .await?
            .iter()
            .map(|line| parse::parse_overview_fmt(line))
            .collect()
    }

    /// LIST HEADERS command (RFC 3977 Section 8.6)
    ///
    /// Fields retrievable through HDR; `variant` is `MSGID` or `RANGE`.
    pub async fn list_headers(&mut self, variant: Option<&str>) -> Result<Vec<String>> {
        Ok(self
            .list_lines("LIST HEADERS", variant)
            .await?
            .iter()
            .map(|line| line.trim().to_string())
            .collect())
    }

    /// LIST EXTENSIONS command
    ///
    /// Extensions supported by the server (pre-RFC 3977 discovery).
    pub async fn list_extensions(&mut self) -> Result<Vec<String>> {
        let (code, message) = self.command("LIST EXTENSIONS", None).await?;
        if code != codes::EXTENSIONS_FOLLOW {
            return Err(NntpError::reply(code, message));
        }

        let mut reader = self.info(code, &message, false);
        let mut extensions = Vec::new();
        while let Some(line) = reader.next_line().await? {
            extensions.push(line.trim().to_string());
        }
        Ok(extensions)
    }

    /// The overview field layout used to label XOVER/XZVER values
    ///
    /// Fetched with LIST OVERVIEW.FMT on first use and cached for the life of
    /// the connection; servers without the command get the RFC 2980 required
    /// fields.
    pub async fn overview_fmt(&mut self) -> Result<Vec<OverviewField>> {
        if let Some(fmt) = &self.overview_fmt {
            return Ok(fmt.clone());
        }
        let fmt = match self.list_overview_fmt().await {
            Ok(fmt) => fmt,
            Err(e) => {
                debug!("LIST OVERVIEW.FMT unavailable ({e}), using required fields");
                REQUIRED_OVERVIEW_FIELDS
                    .iter()
                    .map(|name| OverviewField {
                        name: (*name).to_string(),
                        full: false,
                    })
                    .collect()
            }
        };
        self.overview_fmt = Some(fmt.clone());
        Ok(fmt)
    }
}
