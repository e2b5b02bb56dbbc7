//! Lazy multi-line response readers
//!
//! Multi-line NNTP responses arrive in one of three framings:
//!
//! - **plain**: CRLF lines, dot-stuffed, terminated by the 3-byte `.\r\n`
//!   sentinel line
//! - **yEnc+zlib** (`XZVER`/`XZHDR`): a plain-framed body whose lines are a
//!   yEnc stream carrying a raw-deflate payload, CRC-checked against the
//!   `=yend` trailer
//! - **gzip** (`XFEATURE COMPRESS GZIP`): a gzip- or zlib-framed byte stream
//!   re-framed into lines after inflation, with the sentinel either inside
//!   the compressed payload (`TERMINATOR` variant) or after it
//!
//! [`InfoReader`] decodes all three behind one pull interface. It mutably
//! borrows the connection for its whole life, so the borrow checker already
//! rules out interleaved commands; the `generating` flag extends that
//! guarantee to readers that are dropped before exhaustion.

use flate2::{Decompress, FlushDecompress, Status};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::trace;

use super::NntpClient;
use crate::buffer::LineBuffer;
use crate::error::{NntpError, Result};
use crate::yenc::{YencDecoder, trailer_crc32};

const SENTINEL: &[u8] = b".\r\n";

/// Remove one leading dot from a dot-stuffed line
fn unstuff(mut line: Vec<u8>) -> Vec<u8> {
    if line.first() == Some(&b'.') {
        line.remove(0);
    }
    line
}

/// Push `input` through a streaming inflate, appending output to `out`.
///
/// Returns the number of input bytes consumed and whether the compressed
/// stream ended inside this chunk (any remaining input is past-the-stream
/// data the caller must handle raw).
fn inflate_chunk(
    inflate: &mut Decompress,
    input: &[u8],
    out: &mut Vec<u8>,
) -> Result<(usize, bool)> {
    let mut consumed = 0;
    let mut buf = [0u8; 16 * 1024];
    while consumed < input.len() {
        let before_in = inflate.total_in();
        let before_out = inflate.total_out();
        let status = inflate
            .decompress(&input[consumed..], &mut buf, FlushDecompress::None)
            .map_err(|_| NntpError::data("Decompression failed"))?;
        let read = (inflate.total_in() - before_in) as usize;
        let wrote = (inflate.total_out() - before_out) as usize;
        consumed += read;
        out.extend_from_slice(&buf[..wrote]);
        if matches!(status, Status::StreamEnd) {
            return Ok((consumed, true));
        }
        // Input and output space were both available, so a stall means the
        // stream cannot be decoded further.
        if read == 0 && wrote == 0 {
            return Err(NntpError::data("Decompression failed"));
        }
    }
    Ok((consumed, false))
}

struct YencZlibState {
    header_seen: bool,
    decoder: YencDecoder,
    inflate: Decompress,
    inflate_done: bool,
    fifo: LineBuffer,
    trailer: Option<Vec<u8>>,
    lines_done: bool,
    finished: bool,
}

struct GzipState {
    /// Chosen from the first payload byte: gzip framing or a bare zlib header
    inflate: Option<Decompress>,
    fifo: LineBuffer,
    /// The compressed stream has ended; subsequent bytes pass through raw
    raw_tail: bool,
    done: bool,
}

enum ReaderState {
    Plain { done: bool },
    YencZlib(Box<YencZlibState>),
    Gzip(Box<GzipState>),
}

/// Lazy reader over the lines of one multi-line response
///
/// Created by [`NntpClient::info`]. Yields each server line exactly once,
/// dot-unstuffed, with the trailing CRLF preserved. The reader must be pulled
/// to exhaustion (`next_line`/`next_raw` returning `None`) before the
/// connection accepts another command.
pub struct InfoReader<'a, S> {
    conn: &'a mut NntpClient<S>,
    state: ReaderState,
}

impl<S: AsyncRead + AsyncWrite + Unpin> NntpClient<S> {
    /// Start reading a multi-line response body
    ///
    /// Dispatches on the status line: a message carrying `COMPRESS=GZIP`
    /// selects the gzip reader; otherwise `yz` selects the yEnc+zlib reader
    /// (for `XZVER`/`XZHDR`); otherwise the plain reader.
    pub fn info(&mut self, code: u16, message: &str, yz: bool) -> InfoReader<'_, S> {
        let state = if message.contains("COMPRESS=GZIP") {
            trace!(code, "reading gzip-compressed response");
            ReaderState::Gzip(Box::new(GzipState {
                inflate: None,
                fifo: LineBuffer::new(),
                raw_tail: false,
                done: false,
            }))
        } else if yz {
            trace!(code, "reading yEnc+zlib response");
            ReaderState::YencZlib(Box::new(YencZlibState {
                header_seen: false,
                decoder: YencDecoder::new(),
                inflate: Decompress::new(false),
                inflate_done: false,
                fifo: LineBuffer::new(),
                trailer: None,
                lines_done: false,
                finished: false,
            }))
        } else {
            trace!(code, "reading plain response");
            ReaderState::Plain { done: false }
        };
        self.generating = true;
        InfoReader { conn: self, state }
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> InfoReader<'_, S> {
    /// Next decoded line as raw bytes, or `None` at the end of the response
    pub async fn next_raw(&mut self) -> Result<Option<Vec<u8>>> {
        let Self { conn, state } = self;
        match state {
            ReaderState::Plain { done } => {
                if *done {
                    return Ok(None);
                }
                let line = conn.read_line().await?;
                if line == SENTINEL {
                    *done = true;
                    conn.generating = false;
                    return Ok(None);
                }
                Ok(Some(unstuff(line)))
            }

            ReaderState::YencZlib(st) => loop {
                if st.finished {
                    return Ok(None);
                }
                if let Some(line) = st.fifo.readline() {
                    return Ok(Some(line));
                }
                if st.lines_done {
                    st.finished = true;
                    let trailer = st
                        .trailer
                        .take()
                        .ok_or_else(|| NntpError::data("Missing yEnc trailer"))?;
                    let expected = trailer_crc32(&trailer)
                        .ok_or_else(|| NntpError::data("Bad yEnc trailer"))?;
                    if expected != st.decoder.crc32() {
                        return Err(NntpError::data("Bad yEnc CRC"));
                    }
                    return Ok(None);
                }
                let line = conn.read_line().await?;
                if line == SENTINEL {
                    st.lines_done = true;
                    conn.generating = false;
                    continue;
                }
                let line = unstuff(line);
                if !st.header_seen {
                    if !line.starts_with(b"=ybegin") {
                        return Err(NntpError::data("Bad yEnc header"));
                    }
                    st.header_seen = true;
                    continue;
                }
                if line.starts_with(b"=yend") {
                    st.trailer = Some(line);
                    continue;
                }
                let data = st.decoder.decode(&line);
                if st.inflate_done || data.is_empty() {
                    continue;
                }
                let mut inflated = Vec::new();
                let (_, ended) = inflate_chunk(&mut st.inflate, &data, &mut inflated)?;
                if ended {
                    st.inflate_done = true;
                }
                st.fifo.write(&inflated);
            },

            ReaderState::Gzip(st) => loop {
                if st.done {
                    return Ok(None);
                }
                if let Some(line) = st.fifo.readline() {
                    if line == SENTINEL {
                        st.done = true;
                        conn.generating = false;
                        return Ok(None);
                    }
                    return Ok(Some(unstuff(line)));
                }
                let chunk = conn.read_chunk().await?;
                if st.raw_tail {
                    st.fifo.write(&chunk);
                    continue;
                }
                let inflate = st.inflate.get_or_insert_with(|| {
                    if chunk.first() == Some(&0x1f) {
                        Decompress::new_gzip(15)
                    } else {
                        Decompress::new(true)
                    }
                });
                let mut inflated = Vec::new();
                let (consumed, ended) = inflate_chunk(inflate, &chunk, &mut inflated)?;
                st.fifo.write(&inflated);
                if ended {
                    // Whatever follows the compressed stream is the raw
                    // trailing sentinel (the non-TERMINATOR server variant).
                    st.raw_tail = true;
                    st.fifo.write(&chunk[consumed..]);
                }
            },
        }
    }

    /// Next decoded line as a string (invalid UTF-8 replaced), or `None` at
    /// the end of the response
    pub async fn next_line(&mut self) -> Result<Option<String>> {
        Ok(self
            .next_raw()
            .await?
            .map(|line| String::from_utf8_lossy(&line).into_owned()))
    }

    /// Drain and discard the remainder of the response
    pub async fn drain(&mut self) -> Result<()> {
        while self.next_raw().await?.is_some() {}
        Ok(())
    }
}
