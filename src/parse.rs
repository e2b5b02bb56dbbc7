//! Boundary parsers for info response lines
//!
//! These turn single wire lines from multi-line responses into typed values.
//! They are deliberately strict: a line that cannot be parsed is a
//! [`NntpError::Data`] because it means the response content is not what the
//! command contract promised.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{NntpError, Result};
use crate::types::{Newsgroup, OverviewField};

/// Parse a newsgroup info line: `name low high status`
///
/// The integers keep their on-wire order (first is the low water mark).
pub fn parse_newsgroup(line: &str) -> Result<Newsgroup> {
    let mut parts = line.split_whitespace();
    let invalid = || NntpError::data("Invalid newsgroup info");
    let name = parts.next().ok_or_else(invalid)?;
    let low = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(invalid)?;
    let high = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(invalid)?;
    let status = parts.next().ok_or_else(invalid)?;
    Ok(Newsgroup {
        name: name.to_string(),
        low,
        high,
        status: status.to_string(),
    })
}

/// Parse one `LIST OVERVIEW.FMT` line
///
/// Accepts the `Name:`, `Name:full` and `:metadata` forms.
pub fn parse_overview_fmt(line: &str) -> Result<OverviewField> {
    let invalid = || NntpError::data("Invalid LIST OVERVIEW.FMT");
    let line = line.trim_end();
    let mut parts = line.split(':');
    let (Some(first), Some(second), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };
    // Metadata fields are listed as ":bytes" / ":lines"
    let (name, suffix) = if first.is_empty() && !second.is_empty() {
        (second, first)
    } else {
        (first, second)
    };
    if !suffix.is_empty() && suffix != "full" {
        return Err(invalid());
    }
    Ok(OverviewField {
        name: name.to_string(),
        full: suffix == "full",
    })
}

/// Parse a `DATE` response timestamp (`YYYYMMDDHHMMSS`) as UTC
pub fn parse_date(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y%m%d%H%M%S")
        .map(|naive| naive.and_utc())
        .map_err(|_| NntpError::data(format!("Invalid date {value:?}")))
}

/// Parse a seconds-since-epoch timestamp as UTC
pub fn parse_epoch(value: &str) -> Result<DateTime<Utc>> {
    let secs: i64 = value
        .trim()
        .parse()
        .map_err(|_| NntpError::data(format!("Invalid epoch {value:?}")))?;
    DateTime::from_timestamp(secs, 0).ok_or_else(|| NntpError::data(format!("Invalid epoch {value:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_newsgroup() {
        let group = parse_newsgroup("misc.test 3000234 3002322 y").unwrap();
        assert_eq!(group.name, "misc.test");
        assert_eq!(group.low, 3000234);
        assert_eq!(group.high, 3002322);
        assert_eq!(group.status, "y");
    }

    #[test]
    fn test_parse_newsgroup_preserves_wire_order() {
        // A server that sends high before low is its own problem; we report
        // the integers in the order they appeared.
        let group = parse_newsgroup("group.one 5 1 y").unwrap();
        assert_eq!((group.low, group.high), (5, 1));
    }

    #[test]
    fn test_parse_newsgroup_underflow() {
        assert!(parse_newsgroup(".hidden.dot").is_err());
        assert!(parse_newsgroup("name 1 2").is_err());
        assert!(parse_newsgroup("name one 2 y").is_err());
        assert!(parse_newsgroup("").is_err());
    }

    #[test]
    fn test_parse_overview_fmt_forms() {
        assert_eq!(
            parse_overview_fmt("Subject:\r\n").unwrap(),
            OverviewField {
                name: "Subject".to_string(),
                full: false
            }
        );
        assert_eq!(
            parse_overview_fmt("Xref:full\r\n").unwrap(),
            OverviewField {
                name: "Xref".to_string(),
                full: true
            }
        );
        assert_eq!(
            parse_overview_fmt(":bytes\r\n").unwrap(),
            OverviewField {
                name: "bytes".to_string(),
                full: false
            }
        );
    }

    #[test]
    fn test_parse_overview_fmt_rejects_garbage() {
        assert!(parse_overview_fmt("Subject\r\n").is_err());
        assert!(parse_overview_fmt("a:b:c\r\n").is_err());
        assert!(parse_overview_fmt("Subject:partial\r\n").is_err());
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("20230801120534").unwrap();
        assert_eq!(
            (date.year(), date.month(), date.day()),
            (2023, 8, 1)
        );
        assert_eq!((date.hour(), date.minute(), date.second()), (12, 5, 34));
        assert!(parse_date("not a date").is_err());
        assert!(parse_date("20231301000000").is_err());
    }

    #[test]
    fn test_parse_epoch() {
        let date = parse_epoch("0").unwrap();
        assert_eq!(date.year(), 1970);
        let date = parse_epoch("1690891200").unwrap();
        assert_eq!((date.year(), date.month()), (2023, 8));
        assert!(parse_epoch("soon").is_err());
    }
}
