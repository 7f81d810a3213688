//! Decoder for the `rela` chunk: fixed 17-byte records.
//!
//! ```text
//! [8 bytes] Subject symbol id
//! [1 byte]  Predicate
//! [8 bytes] Object symbol id
//! ```

use log::debug;

use super::read_symbol_id;
use crate::idx::types::models::{ChunkId, Relation, RelationKind};
use crate::idx::utils;

pub const RELATION_SIZE: usize = 17;

pub fn decode(data: &[u8]) -> Vec<Relation> {
    let decoded = super::decode_records(ChunkId::RELA, data, |reader| {
        Ok(Relation {
            subject: read_symbol_id(reader, "relation subject")?,
            predicate: RelationKind::from(utils::read_u8(reader, "relation predicate")?),
            object: read_symbol_id(reader, "relation object")?,
        })
    });
    debug!("Decoded {} relations", decoded.records.len());
    decoded.records
}
