//! # Record Decoders
//!
//! One decoder per payload chunk. Each is a pure function of the chunk bytes, the
//! [`StringTable`] and, where the layout depends on it, the [`FormatStrategy`].
//!
//! The appendable chunks (`symb`, `refs`, `rela`, `srcs`) are decoded leniently:
//! the first record that cannot be read completely ends the chunk, and every record
//! before it is returned. Nothing is ever guessed from a partial record.
//!
//! [`FormatStrategy`]: crate::idx::format::strategy::FormatStrategy

use log::{trace, warn};

use crate::idx::format::string_table::StringTable;
use crate::idx::types::error::Result;
use crate::idx::types::models::{ChunkId, SymbolId, SymbolLocation};
use crate::idx::utils;

pub mod command;
pub mod refs;
pub mod relations;
pub mod sources;
pub mod symbols;

/// Records decoded from one chunk plus how many bytes they occupied.
#[derive(Debug)]
pub(crate) struct Decoded<T> {
    pub records: Vec<T>,
    pub consumed: usize,
}

/// Runs `decode_one` until the chunk is exhausted or a record fails to decode.
pub(crate) fn decode_records<T>(
    chunk: ChunkId,
    data: &[u8],
    mut decode_one: impl FnMut(&mut &[u8]) -> Result<T>,
) -> Decoded<T> {
    let mut reader = data;
    let mut records = Vec::new();

    while !reader.is_empty() {
        let offset = data.len() - reader.len();
        let mut cursor = reader;
        match decode_one(&mut cursor) {
            Ok(record) => {
                trace!("'{}' record {} at offset {}", chunk, records.len(), offset);
                records.push(record);
                reader = cursor;
            }
            Err(e) => {
                warn!(
                    "'{}' chunk: record {} at offset {}/{} is incomplete ({}), stopping",
                    chunk,
                    records.len(),
                    offset,
                    data.len(),
                    e
                );
                break;
            }
        }
    }

    Decoded {
        records,
        consumed: data.len() - reader.len(),
    }
}

pub(crate) fn read_symbol_id(reader: &mut &[u8], context: &'static str) -> Result<SymbolId> {
    Ok(SymbolId(utils::read_array(reader, context)?))
}

/// Reads a varint string index and resolves it.
pub(crate) fn read_string(reader: &mut &[u8], strings: &StringTable) -> Result<String> {
    Ok(strings.resolve(utils::read_varint(reader)?))
}

/// Reads the five varints of a location: file index, start line/column, end line/column.
pub(crate) fn read_location(reader: &mut &[u8], strings: &StringTable) -> Result<SymbolLocation> {
    read_raw_location(reader, strings).map(|(_, location)| location)
}

/// Like [`read_location`], but a file index of 0 marks the location as absent.
///
/// The coordinates are consumed either way so the stream stays aligned.
pub(crate) fn read_optional_location(
    reader: &mut &[u8],
    strings: &StringTable,
) -> Result<Option<SymbolLocation>> {
    let (file, location) = read_raw_location(reader, strings)?;
    Ok((file != 0).then_some(location))
}

fn read_raw_location(reader: &mut &[u8], strings: &StringTable) -> Result<(u64, SymbolLocation)> {
    let file = utils::read_varint(reader)?;
    let start_line = utils::read_varint(reader)?;
    let start_column = utils::read_varint(reader)?;
    let end_line = utils::read_varint(reader)?;
    let end_column = utils::read_varint(reader)?;
    Ok((
        file,
        SymbolLocation {
            file_uri: strings.resolve(file),
            start_line,
            start_column,
            end_line,
            end_column,
        },
    ))
}
