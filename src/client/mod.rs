//! NNTP client implementation with TLS and compression support

mod articles;
mod compression;
mod connection;
mod group_ops;
mod info;
mod io;
mod listing;
mod metadata;
mod over;
mod posting;

pub use info::InfoReader;
pub use over::{HeaderValues, Overviews};

use crate::buffer::LineBuffer;
use crate::config::ServerConfig;
use crate::types::OverviewField;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tracing::debug;

/// Client over a plain TCP transport
pub type PlainClient = NntpClient<TcpStream>;
/// Client over a rustls TLS transport
pub type TlsClient = NntpClient<TlsStream<TcpStream>>;

/// Async NNTP client, generic over its transport
///
/// The transport only needs to be a reliable ordered byte stream; TLS is
/// obtained by wrapping the stream before handing it to the client. Use
/// [`connect`](NntpClient::connect) / [`connect_tls`](NntpClient::connect_tls)
/// for the common cases, or [`handshake`](NntpClient::handshake) to drive any
/// `AsyncRead + AsyncWrite` transport (including an in-memory duplex in
/// tests).
///
/// The protocol is strictly request/response: multi-line responses are
/// consumed through a lazy [`InfoReader`] that mutably borrows the client,
/// so a second command cannot be issued while one is outstanding. A reader
/// dropped before exhaustion leaves the connection mid-response and further
/// commands fail with [`NntpError::Sync`](crate::NntpError::Sync).
///
/// # Example
///
/// ```no_run
/// use nntp_stream::{NntpClient, ServerConfig};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ServerConfig::tls("news.example.com", "user", "pass");
/// let mut client = NntpClient::connect_tls(Arc::new(config)).await?;
/// client.mode_reader().await?;
/// let help = client.help().await?;
/// println!("{help}");
/// # Ok(())
/// # }
/// ```
#[must_use]
#[derive(Debug)]
pub struct NntpClient<S> {
    /// The transport byte stream
    stream: S,
    /// Receive buffer; all transport reads land here
    buffer: LineBuffer,
    /// True while a lazy response reader is outstanding
    generating: bool,
    /// Server configuration (credentials feed the lazy AUTHINFO exchange)
    config: Arc<ServerConfig>,
    /// Whether the greeting advertised posting (200 vs 201)
    posting_allowed: bool,
    /// Overview format cache, filled on first use
    overview_fmt: Option<Vec<OverviewField>>,
    /// Coarse per-operation timeout
    timeout: Duration,
}

impl<S: AsyncRead + AsyncWrite + Unpin> NntpClient<S> {
    /// Whether the server greeting advertised posting permission
    pub fn posting_allowed(&self) -> bool {
        self.posting_allowed
    }

    /// True while a multi-line response reader is outstanding
    pub fn is_generating(&self) -> bool {
        self.generating
    }
}

impl<S> Drop for NntpClient<S> {
    fn drop(&mut self) {
        debug!("NntpClient dropped");
    }
}
