//! Connection establishment, greeting, and teardown
//!
//! TCP/TLS setup, socket tuning, the greeting check, and the session
//! administration commands (MODE READER, QUIT).

use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::client::danger::{
    HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier,
};
use tokio_rustls::rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use tokio_rustls::rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use tracing::{debug, warn};

use super::NntpClient;
use crate::buffer::LineBuffer;
use crate::config::ServerConfig;
use crate::error::{NntpError, Result};
use crate::response::codes;

/// TCP connection timeout in seconds
const TCP_CONNECT_TIMEOUT_SECS: u64 = 120;

/// TLS handshake timeout in seconds
const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 60;

/// Receive buffer size requested from the OS (high-latency downloads)
const RECV_BUFFER_SIZE: usize = 4 * 1024 * 1024;

/// Dangerous certificate verifier that accepts all certificates
///
/// **Security Warning:** disables all certificate validation. Only used when
/// `ServerConfig::allow_insecure_tls` is set.
#[derive(Debug)]
struct DangerousAcceptAnyCertificate;

impl ServerCertVerifier for DangerousAcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, tokio_rustls::rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, tokio_rustls::rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, tokio_rustls::rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        vec![
            SignatureScheme::RSA_PKCS1_SHA256,
            SignatureScheme::RSA_PKCS1_SHA384,
            SignatureScheme::RSA_PKCS1_SHA512,
            SignatureScheme::ECDSA_NISTP256_SHA256,
            SignatureScheme::ECDSA_NISTP384_SHA384,
            SignatureScheme::ECDSA_NISTP521_SHA512,
            SignatureScheme::RSA_PSS_SHA256,
            SignatureScheme::RSA_PSS_SHA384,
            SignatureScheme::RSA_PSS_SHA512,
            SignatureScheme::ED25519,
            SignatureScheme::ED448,
        ]
    }
}

async fn connect_tcp(config: &ServerConfig) -> Result<TcpStream> {
    debug!(
        "connecting to NNTP server {}:{}",
        config.host, config.port
    );

    let stream = timeout(
        Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
        TcpStream::connect((config.host.as_str(), config.port)),
    )
    .await
    .map_err(|_| NntpError::Timeout)??;

    // Low-latency request/response pattern
    stream.set_nodelay(true)?;

    // Enlarged receive buffer reduces ACK round trips on long-haul links
    let socket = socket2::SockRef::from(&stream);
    if let Err(e) = socket.set_recv_buffer_size(RECV_BUFFER_SIZE) {
        warn!("failed to set receive buffer size: {}", e);
    }

    Ok(stream)
}

fn tls_connector(config: &ServerConfig) -> TlsConnector {
    use tokio_rustls::rustls::crypto::{CryptoProvider, ring};
    let _ = CryptoProvider::install_default(ring::default_provider());

    let tls_config = if config.allow_insecure_tls {
        warn!("TLS certificate validation disabled - connection vulnerable to MITM attacks");
        ClientConfig::builder()
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(DangerousAcceptAnyCertificate))
            .with_no_client_auth()
    } else {
        let mut root_store = RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth()
    };

    TlsConnector::from(Arc::new(tls_config))
}

impl NntpClient<TcpStream> {
    /// Connect over plain TCP and read the server greeting
    ///
    /// **Warning:** credentials travel in clear text; prefer
    /// [`connect_tls`](NntpClient::connect_tls).
    pub async fn connect(config: Arc<ServerConfig>) -> Result<Self> {
        let stream = connect_tcp(&config).await?;
        Self::handshake(stream, config).await
    }
}

impl NntpClient<TlsStream<TcpStream>> {
    /// Connect with TLS and read the server greeting
    pub async fn connect_tls(config: Arc<ServerConfig>) -> Result<Self> {
        let stream = connect_tcp(&config).await?;

        let connector = tls_connector(&config);
        let server_name = ServerName::try_from(config.host.as_str())
            .map_err(|e| NntpError::Tls(format!("Invalid domain: {e}")))?
            .to_owned();

        let tls_stream = timeout(
            Duration::from_secs(TLS_HANDSHAKE_TIMEOUT_SECS),
            connector.connect(server_name, stream),
        )
        .await
        .map_err(|_| NntpError::Timeout)?
        .map_err(|e| NntpError::Tls(format!("TLS handshake failed: {e}")))?;

        Self::handshake(tls_stream, config).await
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> NntpClient<S> {
    /// Establish an NNTP session over an already-connected transport
    ///
    /// Reads the greeting and requires 200 (posting allowed) or 201 (no
    /// posting). Authentication is not performed here; it happens lazily
    /// when a server answers 480 to a command.
    pub async fn handshake(stream: S, config: Arc<ServerConfig>) -> Result<Self> {
        let timeout = config.timeout;
        let mut client = Self {
            stream,
            buffer: LineBuffer::new(),
            generating: false,
            config,
            posting_allowed: false,
            overview_fmt: None,
            timeout,
        };

        let (code, message) = client.status().await?;
        debug!("server greeting: {} {}", code, message);
        if code != codes::READY_POSTING_ALLOWED && code != codes::READY_NO_POSTING {
            return Err(NntpError::reply(code, message));
        }
        client.posting_allowed = code == codes::READY_POSTING_ALLOWED;

        Ok(client)
    }

    /// MODE READER command (RFC 3977 Section 5.3)
    ///
    /// Instructs a mode-switching server to switch modes. Returns whether
    /// posting is allowed.
    pub async fn mode_reader(&mut self) -> Result<bool> {
        let (code, message) = self.command("MODE READER", None).await?;
        if code != codes::READY_POSTING_ALLOWED && code != codes::READY_NO_POSTING {
            return Err(NntpError::reply(code, message));
        }
        self.posting_allowed = code == codes::READY_POSTING_ALLOWED;
        Ok(self.posting_allowed)
    }

    /// QUIT command (RFC 3977 Section 5.4)
    ///
    /// Graceful shutdown: waits for the server's 205 and closes the
    /// transport. Use [`close`](Self::close) when the connection state is
    /// indeterminate (e.g. after dropping a reader mid-stream).
    pub async fn quit(mut self) -> Result<()> {
        let (code, message) = self.command("QUIT", None).await?;
        if code != codes::CLOSING_CONNECTION {
            return Err(NntpError::reply(code, message));
        }
        debug!("connection closed by QUIT");
        self.stream.shutdown().await.ok();
        Ok(())
    }

    /// Close the transport unconditionally
    pub async fn close(mut self) {
        self.stream.shutdown().await.ok();
    }
}
