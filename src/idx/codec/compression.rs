//! Decompression for the string pool.
//!
//! clangd stores the `stri` chunk either raw or as a single zlib stream; no other
//! compression scheme exists in formats 12..=20.

use std::io::Read;

use flate2::read::ZlibDecoder;
use log::trace;

use crate::idx::types::error::{IdxError, Result};

/// Upper bound on what is reserved up front; the declared size comes from the file.
const MAX_PREALLOCATION: u64 = 16 * 1024 * 1024;

/// Inflates a zlib payload and verifies it yields exactly `expected_size` bytes.
///
/// # Errors
/// - [`IdxError::DecompressionError`] if the zlib stream is corrupt
/// - [`IdxError::ChecksumMismatch`] if the inflated length differs from `expected_size`
///
/// Inflation stops one byte past `expected_size`, so an oversized stream reports
/// `expected_size + 1` as the found length.
pub fn inflate_zlib(payload: &[u8], expected_size: u64) -> Result<Vec<u8>> {
    trace!(
        "Decompressing with Zlib: {} bytes -> {} bytes (expected)",
        payload.len(),
        expected_size
    );

    let mut output = Vec::with_capacity(expected_size.min(MAX_PREALLOCATION) as usize);
    let mut decoder = ZlibDecoder::new(payload).take(expected_size.saturating_add(1));
    decoder.read_to_end(&mut output).map_err(|e| {
        IdxError::DecompressionError(format!("Zlib decompression failed: {}", e))
    })?;

    if output.len() as u64 != expected_size {
        return Err(IdxError::ChecksumMismatch {
            expected: expected_size,
            found: output.len() as u64,
        });
    }

    Ok(output)
}
