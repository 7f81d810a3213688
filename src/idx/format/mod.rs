//! File format parsing layer for clangd index shards.
//!
//! # Module Organization
//!
//! - [`container`]: Splits the RIFF envelope into chunks
//! - [`string_table`]: Builds the interned string pool from `stri`
//! - [`strategy`]: Selects the per-version record layout from `meta`
//! - [`records`]: Decodes the payload chunks into model types
//!
//! # Architecture
//!
//! ```text
//! File Structure:
//! ┌─────────────────┐
//! │  RIFF header    │ ← container::Container::parse()
//! ├─────────────────┤
//! │  meta           │ ← strategy::FormatStrategy::from_meta()
//! │  stri           │ ← string_table::StringTable::parse()
//! ├─────────────────┤
//! │  symb refs rela │ ← records::{symbols, refs, relations,
//! │  srcs cmdl      │            sources, command}::decode()
//! └─────────────────┘
//! ```

pub mod container;
pub mod records;
pub mod strategy;
pub mod string_table;
