//! Error types for prettify.
//!
//! The renderer itself never fails on missing or malformed event data; every
//! optional field degrades to a default. The variants here cover the edges of
//! the crate: writing to the output stream, decoding the event stream and
//! loading configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for prettify operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for prettify.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Output Errors
    // ========================================================================
    /// Writing rendered text to the output stream failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ========================================================================
    // Event Stream Errors
    // ========================================================================
    /// A line of the event stream could not be decoded.
    #[error("Failed to decode event on line {line}: {source}")]
    Decode {
        /// 1-based line number in the input stream
        line: usize,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// An event carried a timestamp that is not valid RFC 3339.
    #[error("Invalid event timestamp '{value}' on line {line}")]
    InvalidTimestamp {
        /// 1-based line number in the input stream
        line: usize,
        /// The offending value
        value: String,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration file not found.
    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    /// Creates a new decode error for the given input line.
    pub fn decode(line: usize, source: serde_json::Error) -> Self {
        Self::Decode { line, source }
    }

    /// Returns true if processing of the event stream can continue.
    ///
    /// Bad input lines are skipped; output and configuration failures are not.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Decode { .. } | Error::InvalidTimestamp { .. })
    }

    /// Returns the error code for CLI exit status.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Io(_) => 74,
            Error::ConfigNotFound(_) | Error::TomlParse(_) => 78,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_is_recoverable() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::decode(3, source);
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("line 3"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_io_error_is_fatal() {
        let err = Error::from(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"));
        assert!(!err.is_recoverable());
        assert_eq!(err.exit_code(), 74);
    }

    #[test]
    fn test_config_error_exit_code() {
        let err = Error::ConfigNotFound(PathBuf::from("/nope.toml"));
        assert_eq!(err.exit_code(), 78);
        assert!(err.to_string().contains("/nope.toml"));
    }
}
