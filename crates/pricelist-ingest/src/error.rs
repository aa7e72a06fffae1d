//! Error types for price-list ingestion.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal reader failures. Nothing proceeds past the reader when one occurs.
#[derive(Debug, Error)]
pub enum ParseError {
    // === Input Errors ===
    /// No bytes, or no non-blank rows after parsing.
    #[error("the file is empty or contains no rows")]
    EmptyInput,

    /// Input exceeds the configured size limit.
    #[error("input is {size} bytes, larger than the {limit} byte limit")]
    InputTooLarge { size: u64, limit: u64 },

    /// The encoding hint is not a known encoding label.
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),

    // === Parsing Errors ===
    /// A quoted field was opened and never closed.
    #[error("quoted field starting on line {line} is never closed")]
    MalformedQuoting { line: u64 },

    /// Underlying CSV reader failure.
    #[error("failed to parse delimited text: {0}")]
    Csv(#[from] csv::Error),

    // === File System Errors ===
    /// Failed to read the input file.
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ParseError::MalformedQuoting { line: 4 };
        assert_eq!(
            err.to_string(),
            "quoted field starting on line 4 is never closed"
        );
        let err = ParseError::InputTooLarge {
            size: 2048,
            limit: 1024,
        };
        assert_eq!(
            err.to_string(),
            "input is 2048 bytes, larger than the 1024 byte limit"
        );
    }
}
