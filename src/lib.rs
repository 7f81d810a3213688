//! # clangd-idx-reader
//!
//! A reader for clangd background-index shard files (`.idx`).
//! Supports format versions 12 through 20, raw and zlib-compressed string pools.
//!
//! ```no_run
//! use clangd_idx_reader::IdxReader;
//!
//! let reader = IdxReader::open("main.cpp.29BD10997380DC29.idx")?;
//! for symbol in reader.symbols() {
//!     println!("{} {}{}", symbol.kind, symbol.scope, symbol.name);
//! }
//! # Ok::<(), clangd_idx_reader::IdxError>(())
//! ```
pub mod idx;

// Re-export the main types for convenience
pub use idx::{
    IdxError, IdxReader, Result,
    format::strategy::FormatStrategy,
    format::string_table::StringTable,
    naming::{ShardName, compute_file_hash, shard_file_name},
    types::models::{
        ChunkId, CompileCommand, FileInfo, IncludeDirective, IncludeGraphNode, IncludeHeader,
        IndexData, RefKind, RefMap, Reference, Relation, RelationKind, Symbol, SymbolFlags,
        SymbolId, SymbolKind, SymbolLanguage, SymbolLocation,
    },
};
