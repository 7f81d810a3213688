//! Custom error types for the clangd-idx-reader crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum IdxError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The container envelope is malformed (bad magic, bad type tag, truncated header).
    #[error("Invalid format in {field}: found {found}")]
    InvalidFormat { field: &'static str, found: String },

    /// One of the mandatory chunks (`meta`, `stri`) is absent.
    #[error("Missing required chunk: {0}")]
    MissingChunk(&'static str),

    /// The shard was written by a producer using a format version outside 12..=20.
    #[error("Unsupported index format version: {0}. Only versions 12 through 20 are supported.")]
    UnsupportedVersion(u32),

    /// The decompressed string pool does not have the size its header declares.
    #[error("Checksum mismatch for string pool: expected {expected} bytes, but found {found} bytes")]
    ChecksumMismatch { expected: u64, found: u64 },

    /// The zlib stream of the string pool could not be inflated at all.
    #[error("Decompression failed: {0}")]
    DecompressionError(String),

    /// A varint or fixed-width field runs past the end of its buffer.
    #[error("Unexpected end of data while reading {context}")]
    UnexpectedEndOfData { context: &'static str },
}

impl IdxError {
    pub(crate) fn eof(context: &'static str) -> Self {
        IdxError::UnexpectedEndOfData { context }
    }
}

/// A convenience `Result` type alias using the crate's `IdxError` type.
pub type Result<T> = std::result::Result<T, IdxError>;
