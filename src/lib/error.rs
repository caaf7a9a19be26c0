use super::polyline::MalformedEncoding;
use std::io;
use thiserror::Error;

/// Failure decoding a single row, before line framing is known.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("ring {ring}: {source}")]
    MalformedEncoding {
        ring: usize,
        source: MalformedEncoding,
    },
    #[error("invalid properties JSON: {0}")]
    InvalidProperties(#[from] serde_json::Error),
}

/// Failure while decoding a row stream. Row errors carry the 1-based
/// line number; a bad row never affects its siblings, so callers can
/// abort or skip per row.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("line {line}: {source}")]
    Row { line: usize, source: RowError },
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod messages {
    use super::*;

    #[test]
    fn row_errors_locate_the_ring() {
        let source = MalformedEncoding { at: 7 };
        let err = RowError::MalformedEncoding { ring: 2, source };
        assert_eq!(err.to_string(), "ring 2: invalid or truncated polyline data at byte 7");
    }

    #[test]
    fn decode_errors_locate_the_line() {
        let source = RowError::MalformedEncoding {
            ring: 0,
            source: MalformedEncoding { at: 3 },
        };
        let err = DecodeError::Row { line: 12, source };
        assert!(err.to_string().starts_with("line 12:"));
    }
}
