//! Protocol argument and result types

use std::fmt;

/// An article number range argument for range-style commands
///
/// Rendered on the wire as `N`, `N-`, or `N-M`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Range {
    /// A single article number
    Single(u64),
    /// All articles from this number up to the group's high water mark
    From(u64),
    /// An inclusive span of article numbers
    Span(u64, u64),
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Range::Single(n) => write!(f, "{n}"),
            Range::From(n) => write!(f, "{n}-"),
            Range::Span(first, last) => write!(f, "{first}-{last}"),
        }
    }
}

impl From<u64> for Range {
    fn from(n: u64) -> Self {
        Range::Single(n)
    }
}

/// A message-id or article range argument (HDR, XPAT and friends)
///
/// Message-ids pass through to the wire unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageSpec {
    /// A message-id, angle brackets included
    MessageId(String),
    /// An article number range
    Range(Range),
}

impl fmt::Display for MessageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageSpec::MessageId(id) => f.write_str(id),
            MessageSpec::Range(range) => range.fmt(f),
        }
    }
}

impl From<Range> for MessageSpec {
    fn from(range: Range) -> Self {
        MessageSpec::Range(range)
    }
}

impl From<u64> for MessageSpec {
    fn from(n: u64) -> Self {
        MessageSpec::Range(Range::Single(n))
    }
}

impl From<&str> for MessageSpec {
    fn from(id: &str) -> Self {
        MessageSpec::MessageId(id.to_string())
    }
}

impl From<String> for MessageSpec {
    fn from(id: String) -> Self {
        MessageSpec::MessageId(id)
    }
}

/// A single article selector (ARTICLE, HEAD, BODY)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleRef {
    /// An article number in the currently selected group
    Number(u64),
    /// A message-id, angle brackets included
    MessageId(String),
}

impl fmt::Display for ArticleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArticleRef::Number(n) => write!(f, "{n}"),
            ArticleRef::MessageId(id) => f.write_str(id),
        }
    }
}

impl From<u64> for ArticleRef {
    fn from(n: u64) -> Self {
        ArticleRef::Number(n)
    }
}

impl From<&str> for ArticleRef {
    fn from(id: &str) -> Self {
        ArticleRef::MessageId(id.to_string())
    }
}

/// One newsgroup entry from `LIST`/`NEWGROUPS` style responses
///
/// The wire carries `name low high status`; the integers keep their on-wire
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Newsgroup {
    /// Group name
    pub name: String,
    /// Low water mark
    pub low: u64,
    /// High water mark
    pub high: u64,
    /// Posting status: `y`, `n`, `m` among others
    pub status: String,
}

/// One field of the overview database format
///
/// `full` fields carry a `Name: ` prefix in their overview values which is
/// stripped on read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewField {
    /// Header or metadata field name
    pub name: String,
    /// Whether overview values repeat the field name prefix
    pub full: bool,
}
