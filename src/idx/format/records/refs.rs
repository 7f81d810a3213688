//! Decoder for the `refs` chunk.
//!
//! # Group Layout
//! ```text
//! [8 bytes]  Symbol id the references point at
//! [varint]   Reference count N
//! N x {
//!   [1 byte]   Kind bitmask
//!   [5 varint] Location (always present)
//!   [8 bytes]  Container symbol id (format 13 and later only)
//! }
//! ```
//!
//! A group with any incomplete reference is dropped whole.

use log::debug;

use super::{read_location, read_symbol_id};
use crate::idx::format::strategy::FormatStrategy;
use crate::idx::format::string_table::StringTable;
use crate::idx::types::error::Result;
use crate::idx::types::models::{ChunkId, RefKind, RefMap, Reference, SymbolId};
use crate::idx::utils;

/// Smallest encoding of one reference without its container: kind byte plus five
/// single-byte varints.
const MIN_REF_SIZE: usize = 6;

pub fn decode(data: &[u8], strings: &StringTable, strategy: FormatStrategy) -> RefMap {
    let decoded = super::decode_records(ChunkId::REFS, data, |reader| {
        read_group(reader, strings, strategy)
    });

    let mut map = RefMap::new();
    for (id, refs) in decoded.records {
        map.insert(id, refs);
    }
    debug!(
        "Decoded references for {} symbols ({} total)",
        map.len(),
        map.total_refs()
    );
    map
}

fn read_group(
    reader: &mut &[u8],
    strings: &StringTable,
    strategy: FormatStrategy,
) -> Result<(SymbolId, Vec<Reference>)> {
    let id = read_symbol_id(reader, "reference group id")?;
    let count = utils::read_varint(reader)?;

    let mut refs = Vec::with_capacity((count as usize).min(reader.len() / MIN_REF_SIZE));
    for _ in 0..count {
        let kind = RefKind(utils::read_u8(reader, "reference kind")?);
        let location = read_location(reader, strings)?;
        let container = strategy.read_ref_container(reader)?;
        refs.push(Reference {
            kind,
            location,
            container,
        });
    }
    Ok((id, refs))
}
