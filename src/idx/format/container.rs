//! RIFF envelope parsing.
//!
//! # Layout
//! ```text
//! [4 bytes] "RIFF"
//! [4 bytes] Total size, little-endian u32 (counts everything after this field)
//! [4 bytes] "CdIx"
//! repeated until the total size is reached:
//!   [4 bytes] Chunk id (ASCII)
//!   [4 bytes] Payload length, little-endian u32
//!   [N bytes] Payload
//!   [0/1 byte] Padding to an even offset
//! ```

use std::collections::HashMap;

use log::{debug, trace, warn};

use crate::idx::types::error::{IdxError, Result};
use crate::idx::types::models::ChunkId;
use crate::idx::utils;

pub const RIFF_MAGIC: [u8; 4] = *b"RIFF";
pub const CLANGD_TYPE_TAG: [u8; 4] = *b"CdIx";

/// Bytes before the first chunk: magic, size and type tag.
const HEADER_LEN: usize = 12;

/// The chunks of one shard, keyed by id, with their file order remembered.
#[derive(Debug, Clone, Default)]
pub struct Container {
    order: Vec<ChunkId>,
    chunks: HashMap<ChunkId, Vec<u8>>,
}

impl Container {
    /// Parses the envelope of a complete shard file.
    ///
    /// Unknown chunk ids are kept under their raw tag. When an id repeats, the last
    /// payload wins.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(IdxError::InvalidFormat {
                field: "header",
                found: format!("{} bytes", data.len()),
            });
        }

        let mut reader = data;
        let magic: [u8; 4] = utils::read_array(&mut reader, "RIFF magic")?;
        if magic != RIFF_MAGIC {
            return Err(IdxError::InvalidFormat {
                field: "magic",
                found: format!("{:?}", String::from_utf8_lossy(&magic)),
            });
        }

        let total_size = utils::read_u32_le(&mut reader, "RIFF size")? as usize;

        let type_tag: [u8; 4] = utils::read_array(&mut reader, "RIFF type tag")?;
        if type_tag != CLANGD_TYPE_TAG {
            return Err(IdxError::InvalidFormat {
                field: "type tag",
                found: format!("{:?}", String::from_utf8_lossy(&type_tag)),
            });
        }

        // The declared size counts the type tag.
        let body_len = total_size.checked_sub(4).ok_or_else(|| IdxError::InvalidFormat {
            field: "size",
            found: total_size.to_string(),
        })?;
        // A truncated envelope fails as a whole: no chunk before the cut is returned,
        // matching clangd's own reader.
        let mut body = utils::take(&mut reader, body_len, "RIFF body")?;
        if !reader.is_empty() {
            debug!("Ignoring {} bytes after the declared RIFF size", reader.len());
        }

        let mut container = Container::default();
        while !body.is_empty() {
            let id = ChunkId(utils::read_array(&mut body, "chunk id")?);
            let len = utils::read_u32_le(&mut body, "chunk length")? as usize;
            let payload = utils::take(&mut body, len, "chunk payload")?;
            trace!("Chunk '{}': {} bytes", id, len);

            // Padding to 2-byte alignment; may be absent at the very end.
            if len % 2 == 1 && !body.is_empty() {
                body = &body[1..];
            }

            if !id.is_known() {
                debug!("Keeping unrecognized chunk '{}' ({} bytes)", id, len);
            }
            container.insert(id, payload.to_vec());
        }

        debug!(
            "RIFF container parsed: {} chunks ({})",
            container.order.len(),
            container
                .order
                .iter()
                .map(ChunkId::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(container)
    }

    fn insert(&mut self, id: ChunkId, data: Vec<u8>) {
        if self.chunks.insert(id, data).is_some() {
            warn!("Duplicate chunk '{}', keeping the last one", id);
        } else {
            self.order.push(id);
        }
    }

    /// Payload of an optional chunk.
    pub fn get(&self, id: ChunkId) -> Option<&[u8]> {
        self.chunks.get(&id).map(Vec::as_slice)
    }

    /// Payload of a mandatory chunk; absence is [`IdxError::MissingChunk`].
    pub fn require(&self, id: ChunkId, name: &'static str) -> Result<&[u8]> {
        self.get(id).ok_or(IdxError::MissingChunk(name))
    }

    pub fn contains(&self, id: ChunkId) -> bool {
        self.chunks.contains_key(&id)
    }

    /// Chunk ids in the order they first appear in the file.
    pub fn ids(&self) -> &[ChunkId] {
        &self.order
    }

    /// Chunk ids with payload sizes, in file order.
    pub fn sizes(&self) -> Vec<(ChunkId, usize)> {
        self.order
            .iter()
            .map(|id| (*id, self.chunks.get(id).map_or(0, Vec::len)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn riff(chunks: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(b"CdIx");
        for (id, payload) in chunks {
            body.extend_from_slice(*id);
            body.extend_from_slice(&(payload.len() as u32).to_le_bytes());
            body.extend_from_slice(payload);
            if payload.len() % 2 == 1 {
                body.push(0);
            }
        }
        let mut data = Vec::new();
        data.extend_from_slice(b"RIFF");
        data.extend_from_slice(&(body.len() as u32).to_le_bytes());
        data.extend_from_slice(&body);
        data
    }

    #[test]
    fn test_riff_container_parsing() {
        let data = riff(&[(b"test", &b"data"[..])]);
        let container = Container::parse(&data).unwrap();
        assert_eq!(container.get(ChunkId(*b"test")), Some(&b"data"[..]));
        assert_eq!(container.ids(), &[ChunkId(*b"test")]);
    }

    #[test]
    fn test_odd_length_chunks_are_padded() {
        let data = riff(&[(b"meta", &b"abc"[..]), (b"stri", &b"xy"[..])]);
        let container = Container::parse(&data).unwrap();
        assert_eq!(container.get(ChunkId::META), Some(&b"abc"[..]));
        assert_eq!(container.get(ChunkId::STRI), Some(&b"xy"[..]));
        assert_eq!(
            container.sizes(),
            vec![(ChunkId::META, 3), (ChunkId::STRI, 2)]
        );
    }

    #[test]
    fn test_missing_final_padding_is_tolerated() {
        let mut data = riff(&[(b"meta", &b"abc"[..])]);
        data.pop();
        let new_size = (data.len() - 8) as u32;
        data[4..8].copy_from_slice(&new_size.to_le_bytes());
        let container = Container::parse(&data).unwrap();
        assert_eq!(container.get(ChunkId::META), Some(&b"abc"[..]));
    }

    #[test]
    fn test_unknown_chunks_are_retained() {
        let data = riff(&[(b"lnks", &b"\x01\x02"[..]), (b"meta", &b"\x0c\0\0\0"[..])]);
        let container = Container::parse(&data).unwrap();
        assert!(container.contains(ChunkId(*b"lnks")));
        assert_eq!(container.ids(), &[ChunkId(*b"lnks"), ChunkId::META]);
    }

    #[test]
    fn test_riff_container_invalid_magic() {
        let mut data = riff(&[]);
        data[0..4].copy_from_slice(b"RIFX");
        assert!(matches!(
            Container::parse(&data),
            Err(IdxError::InvalidFormat { field: "magic", .. })
        ));
    }

    #[test]
    fn test_riff_container_invalid_type() {
        let mut data = riff(&[]);
        data[8..12].copy_from_slice(b"WAVE");
        assert!(matches!(
            Container::parse(&data),
            Err(IdxError::InvalidFormat { field: "type tag", .. })
        ));
    }

    #[test]
    fn test_short_header_is_a_format_error() {
        assert!(matches!(
            Container::parse(b"RIFF\x04\0"),
            Err(IdxError::InvalidFormat { field: "header", .. })
        ));
    }

    #[test]
    fn test_chunk_past_declared_size_is_rejected() {
        let mut data = riff(&[(b"meta", &b"\x0c\0\0\0"[..])]);
        // Claim a longer payload than the body holds.
        data[16..20].copy_from_slice(&64u32.to_le_bytes());
        assert!(matches!(
            Container::parse(&data),
            Err(IdxError::UnexpectedEndOfData { context: "chunk payload" })
        ));
    }

    #[test]
    fn test_truncated_file_keeps_no_chunks() {
        let mut data = riff(&[(b"meta", &b"\x0c\0\0\0"[..]), (b"stri", &b"\0\0\0\0abc"[..])]);
        // Cut inside the second payload; the complete `meta` chunk is not salvaged.
        data.truncate(data.len() - 3);
        let new_size = (data.len() - 8) as u32;
        data[4..8].copy_from_slice(&new_size.to_le_bytes());
        assert!(matches!(
            Container::parse(&data),
            Err(IdxError::UnexpectedEndOfData { context: "chunk payload" })
        ));
    }

    #[test]
    fn test_declared_size_past_buffer_is_rejected() {
        let mut data = riff(&[(b"meta", &b"\x0c\0\0\0"[..])]);
        data[4..8].copy_from_slice(&1000u32.to_le_bytes());
        assert!(matches!(
            Container::parse(&data),
            Err(IdxError::UnexpectedEndOfData { context: "RIFF body" })
        ));
    }

    #[test]
    fn test_require_names_missing_chunk() {
        let container = Container::parse(&riff(&[])).unwrap();
        assert!(matches!(
            container.require(ChunkId::STRI, "stri"),
            Err(IdxError::MissingChunk("stri"))
        ));
    }

    #[test]
    fn test_duplicate_chunk_last_wins() {
        let data = riff(&[(b"cmdl", &b"aa"[..]), (b"cmdl", &b"bb"[..])]);
        let container = Container::parse(&data).unwrap();
        assert_eq!(container.get(ChunkId::CMDL), Some(&b"bb"[..]));
        assert_eq!(container.ids().len(), 1);
    }
}
