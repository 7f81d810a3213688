//! Low-level byte reading utilities.
//!
//! Every reader takes a `&mut &[u8]` cursor and advances it past what it consumed.
//! Running out of bytes is always reported as [`IdxError::UnexpectedEndOfData`].

use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};
use log::trace;

use crate::idx::types::error::{IdxError, Result};

/// Read a single byte.
pub fn read_u8(reader: &mut &[u8], context: &'static str) -> Result<u8> {
    reader.read_u8().map_err(|_| IdxError::eof(context))
}

/// Read a little-endian 32-bit number.
///
/// Used for the RIFF size fields, the format version and the string-pool header.
pub fn read_u32_le(reader: &mut &[u8], context: &'static str) -> Result<u32> {
    reader
        .read_u32::<LittleEndian>()
        .map_err(|_| IdxError::eof(context))
}

/// Read a fixed-width byte array (tags, symbol ids, digests).
pub fn read_array<const N: usize>(reader: &mut &[u8], context: &'static str) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    reader
        .read_exact(&mut buf)
        .map_err(|_| IdxError::eof(context))?;
    Ok(buf)
}

/// Split off the next `len` bytes.
pub fn take<'a>(reader: &mut &'a [u8], len: usize, context: &'static str) -> Result<&'a [u8]> {
    if reader.len() < len {
        return Err(IdxError::eof(context));
    }
    let (head, tail) = reader.split_at(len);
    *reader = tail;
    Ok(head)
}

/// Read an unsigned little-endian base-128 varint.
///
/// Each byte contributes its low 7 bits, a set high bit means another byte follows.
/// All continuation bytes are consumed even when the value is too large, so the
/// cursor always ends up after the varint. A value wider than 64 bits saturates to
/// `u64::MAX`: as a string index it resolves to `""`, as a count it runs out of data.
pub fn read_varint(reader: &mut &[u8]) -> Result<u64> {
    let mut result = 0u64;
    let mut shift = 0u32;
    let mut overflow = false;

    loop {
        let (&byte, rest) = reader
            .split_first()
            .ok_or_else(|| IdxError::eof("varint"))?;
        *reader = rest;

        let bits = (byte & 0x7F) as u64;
        if shift < 64 {
            let shifted = bits << shift;
            if shifted >> shift != bits {
                overflow = true;
            }
            result |= shifted;
        } else if bits != 0 {
            overflow = true;
        }

        if byte & 0x80 == 0 {
            break;
        }
        shift = shift.saturating_add(7);
    }

    if overflow {
        trace!("Varint wider than 64 bits, saturating");
        return Ok(u64::MAX);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn varint(bytes: &[u8]) -> Result<u64> {
        let mut reader = bytes;
        read_varint(&mut reader)
    }

    #[test]
    fn test_varint_decoding() {
        assert_eq!(varint(&[0x1A]).unwrap(), 0x1A);
        assert_eq!(varint(&[0x9A, 0x2F]).unwrap(), 6042);
        assert_eq!(varint(&[0x7F]).unwrap(), 127);
        assert_eq!(varint(&[0x80, 0x01]).unwrap(), 128);
        assert_eq!(varint(&[0xF8, 0xAC, 0xD1, 0x91, 0x01]).unwrap(), 0x12345678);
    }

    #[test]
    fn test_varint_wider_than_32_bits() {
        assert_eq!(varint(&[0x80, 0x80, 0x80, 0x80, 0x10]).unwrap(), 1 << 32);
        let max = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01];
        assert_eq!(varint(&max).unwrap(), u64::MAX);
    }

    #[test]
    fn test_varint_wider_than_64_bits_saturates_and_stays_aligned() {
        let bytes = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F, 0xAA];
        let mut reader = &bytes[..];
        assert_eq!(read_varint(&mut reader).unwrap(), u64::MAX);
        assert_eq!(reader, &[0xAA]);

        // 2^70: only bit 70 set, so nothing below bit 64 survives a plain shift.
        let bytes = [0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x01, 0x05];
        let mut reader = &bytes[..];
        assert_eq!(read_varint(&mut reader).unwrap(), u64::MAX);
        assert_eq!(read_varint(&mut reader).unwrap(), 5);
    }

    #[test]
    fn test_varint_redundant_zero_continuation_is_accepted() {
        // Padding zeros past bit 64 carry no information.
        let bytes = [0x81, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x00];
        assert_eq!(varint(&bytes).unwrap(), 1);
    }

    #[test]
    fn test_varint_unexpected_end() {
        assert!(matches!(varint(&[]), Err(IdxError::UnexpectedEndOfData { .. })));
        assert!(matches!(varint(&[0x80]), Err(IdxError::UnexpectedEndOfData { .. })));
        assert!(matches!(varint(&[0xFF, 0xFF]), Err(IdxError::UnexpectedEndOfData { .. })));
    }

    #[test]
    fn test_varint_advances_cursor() {
        let bytes = [0x96, 0x01, 0x05];
        let mut reader = &bytes[..];
        assert_eq!(read_varint(&mut reader).unwrap(), 150);
        assert_eq!(read_varint(&mut reader).unwrap(), 5);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_fixed_width_readers() {
        let bytes = [0x14, 0x00, 0x00, 0x00, 1, 2, 3, 4, 5, 6, 7, 8, 9];
        let mut reader = &bytes[..];
        assert_eq!(read_u32_le(&mut reader, "version").unwrap(), 20);
        assert_eq!(read_array::<8>(&mut reader, "id").unwrap(), [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(read_u8(&mut reader, "flags").unwrap(), 9);
        assert!(matches!(
            read_u8(&mut reader, "flags"),
            Err(IdxError::UnexpectedEndOfData { context: "flags" })
        ));
    }

    #[test]
    fn test_take_checks_length() {
        let bytes = [1, 2, 3];
        let mut reader = &bytes[..];
        assert_eq!(take(&mut reader, 2, "chunk").unwrap(), &[1, 2]);
        assert!(take(&mut reader, 2, "chunk").is_err());
        assert_eq!(reader, &[3]);
    }
}
