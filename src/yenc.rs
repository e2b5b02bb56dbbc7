//! Streaming yEnc decoder
//!
//! yEnc maps arbitrary bytes into a mostly-printable stream by adding 42
//! (mod 256) and escaping the handful of reserved bytes with a `=` prefix and
//! a further +64. The decoder here is the streaming inverse: it can be fed a
//! wire line at a time, carries the escape flag across calls, and maintains
//! the CRC32 of everything decoded so far for validation against the value in
//! the `=yend` trailer.

use crc32fast::Hasher;

/// Stateful yEnc decoder
///
/// One instance corresponds to exactly one logical yEnc stream (an article
/// body, or the payload of one compressed info response). Constructing a new
/// decoder is the only way to reset the running CRC.
#[derive(Default)]
pub struct YencDecoder {
    escape: bool,
    hasher: Hasher,
}

impl std::fmt::Debug for YencDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YencDecoder")
            .field("escape", &self.escape)
            .field("crc32", &self.crc32())
            .finish()
    }
}

impl YencDecoder {
    /// Create a decoder with a zeroed CRC and no pending escape
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a buffer of yEnc wire bytes, updating the running CRC32
    ///
    /// CR and LF are transport framing and are skipped; `=` marks an escape
    /// that may straddle buffer boundaries.
    pub fn decode(&mut self, buf: &[u8]) -> Vec<u8> {
        let mut data = Vec::with_capacity(buf.len());
        for &b in buf {
            if self.escape {
                data.push(b.wrapping_sub(106));
                self.escape = false;
            } else if b == 0x3D {
                self.escape = true;
            } else if b == 0x0D || b == 0x0A {
                continue;
            } else {
                data.push(b.wrapping_sub(42));
            }
        }
        self.hasher.update(&data);
        data
    }

    /// CRC32 (IEEE, zlib convention) of all bytes decoded so far
    pub fn crc32(&self) -> u32 {
        self.hasher.clone().finalize()
    }
}

/// Extract the CRC32 value from a yEnc `=yend` trailer line
///
/// Matches a whitespace-preceded `crc=` or `crc32=` field followed by eight
/// hex digits, case-insensitively. A `pcrc32=` field does not match. Returns
/// `None` when the trailer carries no such field.
pub fn trailer_crc32(trailer: &[u8]) -> Option<u32> {
    let lower = trailer.to_ascii_lowercase();
    let mut from = 0;
    while let Some(pos) = lower[from..]
        .windows(3)
        .position(|w| w == b"crc")
        .map(|i| i + from)
    {
        from = pos + 1;
        if pos == 0 || !lower[pos - 1].is_ascii_whitespace() {
            continue;
        }
        let mut i = pos + 3;
        if lower[i..].starts_with(b"32") {
            i += 2;
        }
        if lower.get(i) != Some(&b'=') {
            continue;
        }
        let Some(hex) = lower.get(i + 1..i + 9) else {
            continue;
        };
        if !hex.iter().all(u8::is_ascii_hexdigit) {
            continue;
        }
        let hex = std::str::from_utf8(hex).ok()?;
        return u32::from_str_radix(hex, 16).ok();
    }
    None
}
