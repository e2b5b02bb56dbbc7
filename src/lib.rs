#![doc = include_str!("../README.md")]

mod buffer;
mod client;
mod config;
mod error;
/// Case-insensitive ordered header mapping and RFC 5322-style header parsing
pub mod headers;
/// Boundary parsers for newsgroup lines, overview formats, and timestamps
pub mod parse;
mod response;
mod types;
/// Streaming yEnc decoder with running CRC32
pub mod yenc;

pub use buffer::LineBuffer;
pub use client::{HeaderValues, InfoReader, NntpClient, Overviews, PlainClient, TlsClient};
pub use config::ServerConfig;
pub use error::{NntpError, Result};
pub use headers::{Headers, parse_headers, unparse_headers};
pub use parse::{parse_date, parse_epoch, parse_newsgroup, parse_overview_fmt};
pub use response::codes;
pub use types::{ArticleRef, MessageSpec, Newsgroup, OverviewField, Range};
pub use yenc::{YencDecoder, trailer_crc32};
