//! NNTP error types

use thiserror::Error;

/// NNTP protocol and connection errors
#[derive(Error, Debug)]
pub enum NntpError {
    /// IO error during network operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TLS error during secure connection
    #[error("TLS error: {0}")]
    Tls(String),

    /// Operation timeout
    #[error("Connection timeout")]
    Timeout,

    /// The remote closed the connection mid-response
    #[error("Failed to read from socket")]
    ConnectionClosed,

    /// Malformed status line (non-integer code, or code outside 100-599)
    #[error("Invalid status line: {0}")]
    Protocol(String),

    /// Temporary error status (4xx)
    #[error("{code} {message}")]
    Temporary {
        /// NNTP response code
        code: u16,
        /// Status message from the server
        message: String,
    },

    /// Permanent error status (5xx)
    #[error("{code} {message}")]
    Permanent {
        /// NNTP response code
        code: u16,
        /// Status message from the server
        message: String,
    },

    /// Well-formed status with the wrong code for the command just issued
    #[error("{code} {message}")]
    Reply {
        /// NNTP response code
        code: u16,
        /// Status message from the server
        message: String,
    },

    /// Command issued while a multi-line response reader was still active
    #[error("Command issued while a response reader is active")]
    Sync,

    /// Response content could not be decoded or parsed
    #[error("{0}")]
    Data(String),
}

impl NntpError {
    pub(crate) fn data(message: impl Into<String>) -> Self {
        NntpError::Data(message.into())
    }

    pub(crate) fn reply(code: u16, message: impl Into<String>) -> Self {
        NntpError::Reply {
            code,
            message: message.into(),
        }
    }

    /// The status code carried by this error, if any
    pub fn code(&self) -> Option<u16> {
        match self {
            NntpError::Temporary { code, .. }
            | NntpError::Permanent { code, .. }
            | NntpError::Reply { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Result type alias using NntpError
pub type Result<T> = std::result::Result<T, NntpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_accessor() {
        assert_eq!(
            NntpError::Temporary {
                code: 480,
                message: "auth required".to_string()
            }
            .code(),
            Some(480)
        );
        assert_eq!(
            NntpError::Reply {
                code: 423,
                message: "no such article".to_string()
            }
            .code(),
            Some(423)
        );
        assert_eq!(NntpError::Sync.code(), None);
    }

    #[test]
    fn test_display_includes_code() {
        let err = NntpError::Permanent {
            code: 502,
            message: "access denied".to_string(),
        };
        assert_eq!(err.to_string(), "502 access denied");
    }
}
