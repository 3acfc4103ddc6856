//! Error taxonomy for text streams

use crate::encoding::Encoding;
use std::io;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Why a byte sequence could not be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// A byte that cannot start a sequence (lone continuation byte, 0xF8..=0xFF)
    InvalidStartByte,
    /// The source ended, or a new sequence started, before the current one was complete
    TruncatedSequence,
    /// Unpaired UTF-16 surrogate, or a surrogate value encoded in UTF-8/UTF-32
    InvalidSurrogate,
    /// UTF-8 sequence longer than needed for its value
    OverlongEncoding,
    /// Value above U+10FFFF
    OutOfRangeScalar,
}

impl DecodeErrorKind {
    /// Short kebab-case label, as shown in error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            DecodeErrorKind::InvalidStartByte => "invalid-start-byte",
            DecodeErrorKind::TruncatedSequence => "truncated-sequence",
            DecodeErrorKind::InvalidSurrogate => "invalid-surrogate",
            DecodeErrorKind::OverlongEncoding => "overlong-encoding",
            DecodeErrorKind::OutOfRangeScalar => "out-of-range-scalar",
        }
    }
}

impl std::fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Malformed input found while decoding.
///
/// `offset` counts bytes from the start of the stream, BOM included, and
/// points at the first byte of the offending sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{encoding} decode error ({kind}) at byte offset {offset}")]
pub struct DecodeError {
    pub kind: DecodeErrorKind,
    pub offset: u64,
    pub encoding: Encoding,
}

impl DecodeError {
    pub fn new(kind: DecodeErrorKind, offset: u64, encoding: Encoding) -> Self {
        Self { kind, offset, encoding }
    }
}

/// A value that cannot be written in any Unicode transformation format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("scalar value {0:#X} is out of range (above U+10FFFF)")]
    ScalarOutOfRange(u32),
    #[error("surrogate code point {0:#06X} cannot be encoded as a scalar value")]
    SurrogateScalar(u32),
}

/// Top-level error for stream operations
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// I/O failure on an underlying resource, tagged with the stream identity
    #[error("I/O error on {stream}: {source}")]
    Io {
        stream: String,
        #[source]
        source: io::Error,
    },

    /// A required read hit end of data
    #[error("unexpected end of stream on {stream}")]
    UnexpectedEof { stream: String },

    /// Operation on a handle opened in the other direction, or already closed
    #[error("invalid operation on {stream}: {reason}")]
    InvalidOperation { stream: String, reason: &'static str },
}

impl Error {
    pub(crate) fn io(stream: impl Into<String>, source: io::Error) -> Self {
        Error::Io { stream: stream.into(), source }
    }

    /// Returns the decode error, if this is one
    pub fn as_decode(&self) -> Option<&DecodeError> {
        match self {
            Error::Decode(e) => Some(e),
            _ => None,
        }
    }
}
