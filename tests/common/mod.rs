//! Shared harness for scripted NNTP sessions over an in-memory transport
//!
//! Each test spawns a server task that speaks the wire protocol verbatim on
//! one end of a `tokio::io::duplex` pair while the client under test drives
//! the other end.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use nntp_stream::{NntpClient, ServerConfig};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};

pub type ServerIo = BufReader<DuplexStream>;

pub fn config() -> Arc<ServerConfig> {
    Arc::new(ServerConfig::plain("news.test", "u", "p").with_timeout(Duration::from_secs(5)))
}

/// Split an in-memory transport: the client half plus the server half wrapped
/// for line-based scripting
pub fn wire() -> (DuplexStream, ServerIo) {
    let (client_io, server_io) = tokio::io::duplex(1 << 20);
    (client_io, BufReader::new(server_io))
}

/// Read one command line from the client and assert it
pub async fn expect(io: &mut ServerIo, expected: &str) {
    let mut line = String::new();
    io.read_line(&mut line).await.unwrap();
    assert_eq!(line.trim_end(), expected);
}

/// Write raw wire bytes to the client
pub async fn send(io: &mut ServerIo, data: &[u8]) {
    io.write_all(data).await.unwrap();
    io.flush().await.unwrap();
}

/// Read client lines through the lone-dot terminator (a scripted server's
/// view of a POST body); returned lines are trimmed of their CRLF
pub async fn read_until_dot(io: &mut ServerIo) -> Vec<String> {
    let mut lines = Vec::new();
    loop {
        let mut line = String::new();
        io.read_line(&mut line).await.unwrap();
        let line = line.trim_end_matches("\r\n").to_string();
        if line == "." {
            return lines;
        }
        lines.push(line);
    }
}

/// Read the greeting handshake on the client half, with client diagnostics
/// routed to the test's captured output
pub async fn handshake(client_io: DuplexStream) -> NntpClient<DuplexStream> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init()
        .ok();
    NntpClient::handshake(client_io, config()).await.unwrap()
}

/// yEnc-encode `data` into dot-stuffed CRLF wire lines of ~128 encoded bytes
pub fn yenc_wire_lines(data: &[u8]) -> Vec<Vec<u8>> {
    let mut encoded = Vec::new();
    for &b in data {
        let e = b.wrapping_add(42);
        if matches!(e, 0x00 | 0x0A | 0x0D | 0x3D) {
            encoded.push(b'=');
            encoded.push(e.wrapping_add(64));
        } else {
            encoded.push(e);
        }
    }
    encoded
        .chunks(128)
        .map(|chunk| {
            let mut line = Vec::new();
            if chunk.first() == Some(&b'.') {
                line.push(b'.');
            }
            line.extend_from_slice(chunk);
            line.extend_from_slice(b"\r\n");
            line
        })
        .collect()
}
