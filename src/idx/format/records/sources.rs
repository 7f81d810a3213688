//! Decoder for the `srcs` chunk: the include graph.
//!
//! # Node Layout
//! ```text
//! [1 byte]  Flags (bit 0 = translation unit, bit 1 = had errors)
//! [varint]  URI string index
//! [8 bytes] Content digest
//! [varint]  Direct include count N
//! [N x varint] Include URI string indices
//! ```

use log::debug;

use super::read_string;
use crate::idx::format::string_table::StringTable;
use crate::idx::types::error::Result;
use crate::idx::types::models::{ChunkId, IncludeGraphNode};
use crate::idx::utils;

pub fn decode(data: &[u8], strings: &StringTable) -> Vec<IncludeGraphNode> {
    let decoded = super::decode_records(ChunkId::SRCS, data, |reader| read_node(reader, strings));
    debug!("Decoded {} include graph nodes", decoded.records.len());
    decoded.records
}

fn read_node(reader: &mut &[u8], strings: &StringTable) -> Result<IncludeGraphNode> {
    let flags = utils::read_u8(reader, "source flags")?;
    let uri = read_string(reader, strings)?;
    let digest = utils::read_array(reader, "source digest")?;

    let count = utils::read_varint(reader)?;
    let mut direct_includes = Vec::with_capacity((count as usize).min(reader.len()));
    for _ in 0..count {
        direct_includes.push(read_string(reader, strings)?);
    }

    Ok(IncludeGraphNode {
        flags,
        uri,
        digest,
        direct_includes,
    })
}
