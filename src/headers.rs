//! Article headers
//!
//! Header names compare case-insensitively but keep their insertion order and
//! original spelling, matching how news servers and readers treat them.
//! Repeated names take the last value seen.

use crate::error::{NntpError, Result};

/// Case-insensitive, insertion-ordered header mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Create an empty header mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of headers held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no headers are held
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Set a header value. An existing header with the same name (any case)
    /// keeps its position and spelling; only the value is replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Look up a header value by name, case-insensitively
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// True when a header with this name (any case) is present
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Remove a header by name, returning its value
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let i = self
            .entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))?;
        Some(self.entries.remove(i).1)
    }

    /// Iterate `(name, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}

/// Parse header lines into a [`Headers`] mapping
///
/// Consumes lines up to (not including past) the first blank line.
/// Continuation lines (leading space or tab) are folded into the previous
/// value with their surrounding whitespace stripped. Repeated headers take
/// the last value.
///
/// # Errors
///
/// [`NntpError::Data`] if the first line is a continuation or a line has no
/// colon.
pub fn parse_headers<'a, I>(lines: I) -> Result<Headers>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut entries: Vec<(String, String)> = Vec::new();
    for line in lines {
        if line.is_empty() || line == "\r\n" {
            break;
        }
        if line.starts_with(' ') || line.starts_with('\t') {
            let Some(last) = entries.last_mut() else {
                return Err(NntpError::data("First header is a continuation"));
            };
            last.1.push_str(line.trim());
            continue;
        }
        let Some((name, value)) = line.split_once(':') else {
            return Err(NntpError::data(format!("Invalid header line {line:?}")));
        };
        entries.push((name.trim().to_string(), value.trim().to_string()));
    }
    Ok(entries.into_iter().collect())
}

/// Render headers as a wire block: `Name: value\r\n` per header, then the
/// blank separator line
pub fn unparse_headers(headers: &Headers) -> String {
    let mut out = String::new();
    for (name, value) in headers.iter() {
        out.push_str(name);
        out.push_str(": ");
        out.push_str(value);
        out.push_str("\r\n");
    }
    out.push_str("\r\n");
    out
}
