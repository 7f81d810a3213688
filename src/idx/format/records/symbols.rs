//! Decoder for the `symb` chunk.
//!
//! # Record Layout
//! ```text
//! [8 bytes]  Symbol id
//! [1 byte]   Kind
//! [1 byte]   Language
//! [varint]   Name, scope, template specialization args (string indices)
//! [5 varint] Definition location (file index 0 = none)
//! [5 varint] Canonical declaration location (file index 0 = none)
//! [varint]   Reference count
//! [1 byte]   Flags
//! [varint]   Signature, completion snippet suffix, documentation,
//!            return type, type (string indices)
//! [varint]   Include header count, then that many include headers
//!            (layout depends on the format version)
//! ```

use log::debug;

use super::{read_optional_location, read_string, read_symbol_id};
use crate::idx::format::strategy::FormatStrategy;
use crate::idx::format::string_table::StringTable;
use crate::idx::types::error::Result;
use crate::idx::types::models::{ChunkId, Symbol, SymbolFlags, SymbolKind, SymbolLanguage};
use crate::idx::utils;

/// Decodes every complete symbol record of the chunk.
pub fn decode(data: &[u8], strings: &StringTable, strategy: FormatStrategy) -> Vec<Symbol> {
    let decoded = super::decode_records(ChunkId::SYMB, data, |reader| {
        read_symbol(reader, strings, strategy)
    });
    debug!(
        "Decoded {} symbols ({} of {} bytes)",
        decoded.records.len(),
        decoded.consumed,
        data.len()
    );
    decoded.records
}

fn read_symbol(
    reader: &mut &[u8],
    strings: &StringTable,
    strategy: FormatStrategy,
) -> Result<Symbol> {
    let id = read_symbol_id(reader, "symbol id")?;
    let kind = SymbolKind::from(utils::read_u8(reader, "symbol kind")?);
    let language = SymbolLanguage::from(utils::read_u8(reader, "symbol language")?);

    let name = read_string(reader, strings)?;
    let scope = read_string(reader, strings)?;
    let template_specialization_args = read_string(reader, strings)?;

    let definition = read_optional_location(reader, strings)?;
    let canonical_declaration = read_optional_location(reader, strings)?;

    let references = utils::read_varint(reader)?;
    let flags = SymbolFlags(utils::read_u8(reader, "symbol flags")?);

    let signature = read_string(reader, strings)?;
    let completion_snippet_suffix = read_string(reader, strings)?;
    let documentation = read_string(reader, strings)?;
    let return_type = read_string(reader, strings)?;
    let type_name = read_string(reader, strings)?;

    let include_count = utils::read_varint(reader)?;
    // Each entry takes at least two bytes, so the count cannot outgrow the chunk.
    let mut include_headers = Vec::with_capacity((include_count as usize).min(reader.len() / 2));
    for _ in 0..include_count {
        include_headers.push(strategy.read_include_header(reader, strings)?);
    }

    Ok(Symbol {
        id,
        kind,
        language,
        name,
        scope,
        template_specialization_args,
        definition,
        canonical_declaration,
        references,
        flags,
        signature,
        completion_snippet_suffix,
        documentation,
        return_type,
        type_name,
        include_headers,
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{varint, varints};
    use super::*;
    use crate::idx::types::models::{IncludeDirective, SymbolId};

    // 1 "", 1 "file:///w/foo.h", 2 "MyFunc", 3 "ns::", 4 "void ()", 5 "foo.h", 6 "<foo.h>"
    fn strings() -> StringTable {
        StringTable::from_blob(b"\0file:///w/foo.h\0MyFunc\0ns::\0void ()\0foo.h\0<foo.h>\0")
    }

    fn symbol_bytes(id: u8, kind: u8, definition_file: u64, headers: &[(u64, u64)]) -> Vec<u8> {
        let mut bytes = vec![id; 8];
        bytes.push(kind);
        bytes.push(2); // C++
        varints(&[2, 3, 0], &mut bytes);
        varints(&[definition_file, 4, 5, 4, 11], &mut bytes);
        varints(&[1, 2, 5, 2, 11], &mut bytes);
        varint(17, &mut bytes);
        bytes.push(SymbolFlags::INDEXED_FOR_CODE_COMPLETION | SymbolFlags::VISIBLE_OUTSIDE_FILE);
        varints(&[0, 0, 0, 4, 4], &mut bytes);
        varint(headers.len() as u64, &mut bytes);
        for &(header, refs) in headers {
            varints(&[header, refs], &mut bytes);
        }
        bytes
    }

    #[test]
    fn decodes_all_fields() {
        let data = symbol_bytes(0xAB, 12, 1, &[(6, 9)]);
        let symbols = decode(&data, &strings(), FormatStrategy::V13To17);
        assert_eq!(symbols.len(), 1);

        let symbol = &symbols[0];
        assert_eq!(symbol.id, SymbolId([0xAB; 8]));
        assert_eq!(symbol.kind, SymbolKind::Function);
        assert_eq!(symbol.language, SymbolLanguage::Cxx);
        assert_eq!(symbol.name, "MyFunc");
        assert_eq!(symbol.scope, "ns::");
        assert_eq!(symbol.template_specialization_args, "");
        let definition = symbol.definition.as_ref().unwrap();
        assert_eq!(definition.file_uri, "file:///w/foo.h");
        assert_eq!((definition.start_line, definition.end_column), (4, 11));
        assert_eq!(
            symbol.canonical_declaration.as_ref().unwrap().file_uri,
            "file:///w/foo.h"
        );
        assert_eq!(symbol.references, 17);
        assert_eq!(
            symbol.flags.names(),
            vec!["IndexedForCodeCompletion", "VisibleOutsideFile"]
        );
        assert_eq!(symbol.signature, "");
        assert_eq!(symbol.return_type, "void ()");
        assert_eq!(symbol.type_name, "void ()");
        assert_eq!(symbol.include_headers.len(), 1);
        assert_eq!(symbol.include_headers[0].header, "<foo.h>");
        assert_eq!(symbol.include_headers[0].references, 9);
        assert_eq!(symbol.include_headers[0].directive, IncludeDirective::Include);
    }

    #[test]
    fn absent_definition_keeps_stream_aligned() {
        let mut data = symbol_bytes(1, 12, 0, &[]);
        data.extend(symbol_bytes(2, 7, 1, &[]));
        let symbols = decode(&data, &strings(), FormatStrategy::V12);
        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[0].definition, None);
        assert!(symbols[0].canonical_declaration.is_some());
        assert_eq!(symbols[1].id, SymbolId([2; 8]));
        assert_eq!(symbols[1].kind, SymbolKind::Class);
        assert!(symbols[1].definition.is_some());
    }

    #[test]
    fn unknown_kind_and_language_do_not_abort() {
        let mut data = symbol_bytes(3, 250, 0, &[]);
        data[9] = 77;
        let symbols = decode(&data, &strings(), FormatStrategy::V18Plus);
        assert_eq!(symbols[0].kind, SymbolKind::Unknown(250));
        assert_eq!(symbols[0].language, SymbolLanguage::Unknown(77));
    }

    #[test]
    fn packed_include_headers_in_v18() {
        let data = symbol_bytes(4, 12, 0, &[(5, (3 << 2) | 2), (6, (5 << 2) | 1)]);
        let symbols = decode(&data, &strings(), FormatStrategy::V18Plus);
        let headers = &symbols[0].include_headers;
        assert_eq!(headers[0].header, "foo.h");
        assert_eq!(headers[0].references, 3);
        assert_eq!(headers[0].directive, IncludeDirective::Import);
        assert_eq!(headers[1].references, 5);
        assert_eq!(headers[1].directive, IncludeDirective::Include);
    }

    #[test]
    fn truncated_tail_keeps_earlier_symbols() {
        let mut data = symbol_bytes(1, 12, 1, &[(5, 1)]);
        let second = symbol_bytes(2, 12, 1, &[(5, 1)]);
        let first_len = data.len();
        for cut in 1..second.len() {
            data.truncate(first_len);
            data.extend_from_slice(&second[..cut]);
            let symbols = decode(&data, &strings(), FormatStrategy::V13To17);
            assert_eq!(symbols.len(), 1, "cut at {}", cut);
            assert_eq!(symbols[0].id, SymbolId([1; 8]));
        }
    }

    #[test]
    fn oversized_name_index_resolves_empty_and_decoding_continues() {
        let mut data = symbol_bytes(1, 12, 1, &[]);
        // Swap the one-byte name index for the 11-byte varint 2^70.
        data.splice(10..11, [0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x01]);
        data.extend(symbol_bytes(2, 12, 1, &[]));

        let symbols = decode(&data, &strings(), FormatStrategy::V13To17);
        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[0].name, "");
        assert_eq!(symbols[0].scope, "ns::");
        assert_eq!(symbols[1].id, SymbolId([2; 8]));
        assert_eq!(symbols[1].name, "MyFunc");
    }

    #[test]
    fn empty_chunk_has_no_symbols() {
        assert!(decode(&[], &strings(), FormatStrategy::V12).is_empty());
    }
}
