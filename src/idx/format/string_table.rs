//! The `stri` chunk: an index-addressable pool of interned strings.
//!
//! # Layout
//! ```text
//! [4 bytes] Uncompressed size S, little-endian u32
//! [rest]    S == 0: raw NUL-delimited strings
//!           S != 0: zlib stream that inflates to exactly S bytes
//! ```
//!
//! Index 0 is never a real string; records use it to mean "absent".

use log::debug;

use crate::idx::codec::compression;
use crate::idx::types::error::Result;
use crate::idx::utils;

/// Ordered, 0-based pool of strings resolved from the `stri` chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringTable {
    strings: Vec<String>,
}

impl StringTable {
    /// Builds the table from the raw `stri` chunk payload.
    ///
    /// # Errors
    /// - [`IdxError::UnexpectedEndOfData`](crate::IdxError::UnexpectedEndOfData) if the size header is missing
    /// - [`IdxError::ChecksumMismatch`](crate::IdxError::ChecksumMismatch) if the inflated pool has the wrong size
    pub fn parse(chunk: &[u8]) -> Result<Self> {
        let mut reader = chunk;
        let uncompressed_size = utils::read_u32_le(&mut reader, "string pool size")?;

        let table = if uncompressed_size == 0 {
            debug!("String pool is stored raw ({} bytes)", reader.len());
            Self::from_blob(reader)
        } else {
            debug!(
                "String pool is zlib-compressed ({} -> {} bytes)",
                reader.len(),
                uncompressed_size
            );
            let blob = compression::inflate_zlib(reader, uncompressed_size as u64)?;
            Self::from_blob(&blob)
        };

        debug!("String table built: {} strings", table.len());
        Ok(table)
    }

    /// Splits a NUL-delimited blob into strings.
    ///
    /// Invalid UTF-8 is replaced rather than rejected. A trailing string without a
    /// terminating NUL is kept.
    pub fn from_blob(blob: &[u8]) -> Self {
        let mut strings: Vec<String> = blob
            .split(|&b| b == 0)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .collect();
        // `split` yields one empty piece after the final terminator.
        if blob.last() == Some(&0) || blob.is_empty() {
            strings.pop();
        }
        Self { strings }
    }

    /// Resolves an index. Index 0 and out-of-range indices resolve to `""`.
    pub fn get(&self, index: u64) -> &str {
        if index == 0 {
            return "";
        }
        usize::try_from(index)
            .ok()
            .and_then(|i| self.strings.get(i))
            .map_or("", String::as_str)
    }

    /// Resolves an index to an owned string.
    pub fn resolve(&self, index: u64) -> String {
        self.get(index).to_string()
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Size of the pool as stored: UTF-8 length plus the terminator, per string.
    pub fn total_bytes(&self) -> usize {
        self.strings.iter().map(|s| s.len() + 1).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(String::as_str)
    }
}
