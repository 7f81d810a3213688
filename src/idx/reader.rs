use std::fs;
use std::path::Path;

use log::{debug, info, warn};

use super::format::container::Container;
use super::format::records;
use super::format::strategy::FormatStrategy;
use super::format::string_table::StringTable;
use super::naming::ShardName;
use super::types::error::Result;
use super::types::models::*;

/// The main reader for clangd index shards.
///
/// Opening a shard validates the envelope, reads the format version and builds the
/// string table. The payload chunks are decoded on demand by the accessor methods.
#[derive(Debug, Clone)]
pub struct IdxReader {
    container: Container,
    format_version: u32,
    strategy: FormatStrategy,
    strings: StringTable,
    file_name: Option<String>,
}

impl IdxReader {
    /// Read a shard from the given path.
    ///
    /// The whole file is read into memory; no other I/O happens afterwards.
    ///
    /// # Errors
    /// Returns an error if:
    /// - File cannot be read
    /// - The RIFF envelope is malformed or not a clangd index
    /// - The `meta` or `stri` chunk is missing
    /// - Unsupported format version (outside 12 through 20)
    /// - The string pool does not decompress to its declared size
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening clangd index shard: {}", path.display());
        let bytes = fs::read(path)?;

        let mut reader = Self::from_bytes(&bytes)?;
        reader.file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        Ok(reader)
    }

    /// Read a shard already held in memory. Fails for the same reasons as [`open`](Self::open).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let container = Container::parse(bytes)?;

        let meta = container.require(ChunkId::META, "meta")?;
        let (format_version, strategy) = FormatStrategy::from_meta(meta)?;

        let stri = container.require(ChunkId::STRI, "stri")?;
        let strings = StringTable::parse(stri)?;

        info!(
            "Shard opened: format {} ({}), {} chunks, {} strings",
            format_version,
            strategy,
            container.ids().len(),
            strings.len()
        );

        Ok(Self {
            container,
            format_version,
            strategy,
            strings,
            file_name: None,
        })
    }

    /// One-shot convenience: `from_bytes` followed by `read_all`.
    ///
    /// Only the envelope, `meta` and `stri` can make this fail. Damage in the optional
    /// chunks shortens or omits their collections instead.
    pub fn parse(bytes: &[u8]) -> Result<IndexData> {
        Self::from_bytes(bytes)?.read_all()
    }

    pub fn format_version(&self) -> u32 {
        self.format_version
    }

    pub fn strategy(&self) -> FormatStrategy {
        self.strategy
    }

    pub fn string_table(&self) -> &StringTable {
        &self.strings
    }

    /// Chunk ids in file order, including unrecognized ones.
    pub fn chunk_ids(&self) -> &[ChunkId] {
        self.container.ids()
    }

    pub fn chunk_sizes(&self) -> Vec<(ChunkId, usize)> {
        self.container.sizes()
    }

    pub fn has_chunk(&self, id: ChunkId) -> bool {
        self.container.contains(id)
    }

    /// File-level metadata. The shard name is only known when opened from a path.
    pub fn file_info(&self) -> FileInfo {
        FileInfo {
            file_name: self.file_name.clone(),
            format_version: self.format_version,
            chunks: self.container.sizes(),
            shard: self.file_name.as_deref().and_then(ShardName::parse),
        }
    }

    /// Decodes the `symb` chunk. An absent chunk yields no symbols.
    pub fn symbols(&self) -> Vec<Symbol> {
        self.chunk(ChunkId::SYMB)
            .map(|data| records::symbols::decode(data, &self.strings, self.strategy))
            .unwrap_or_default()
    }

    /// Decodes the `refs` chunk into references grouped by symbol, in chunk order.
    pub fn refs(&self) -> RefMap {
        self.chunk(ChunkId::REFS)
            .map(|data| records::refs::decode(data, &self.strings, self.strategy))
            .unwrap_or_default()
    }

    pub fn relations(&self) -> Vec<Relation> {
        self.chunk(ChunkId::RELA)
            .map(records::relations::decode)
            .unwrap_or_default()
    }

    /// Decodes the `srcs` chunk: the include graph of the translation unit.
    pub fn sources(&self) -> Vec<IncludeGraphNode> {
        self.chunk(ChunkId::SRCS)
            .map(|data| records::sources::decode(data, &self.strings))
            .unwrap_or_default()
    }

    /// Decodes the `cmdl` chunk.
    ///
    /// # Errors
    /// A truncated command record is an error; an absent chunk is `Ok(None)`.
    pub fn command(&self) -> Result<Option<CompileCommand>> {
        match self.chunk(ChunkId::CMDL) {
            Some(data) => records::command::decode(data, &self.strings),
            None => Ok(None),
        }
    }

    /// Decodes every payload chunk.
    ///
    /// A truncated `cmdl` chunk is logged and reported as no command; call
    /// [`command`](Self::command) to get the error itself.
    pub fn read_all(&self) -> Result<IndexData> {
        let command = self.command().unwrap_or_else(|e| {
            warn!("Ignoring unreadable 'cmdl' chunk: {}", e);
            None
        });
        let data = IndexData {
            format_version: self.format_version,
            symbols: self.symbols(),
            refs: self.refs(),
            relations: self.relations(),
            include_graph: self.sources(),
            command,
        };
        info!(
            "Shard decoded: {} symbols, {} refs for {} symbols, {} relations, {} sources",
            data.symbols.len(),
            data.refs.total_refs(),
            data.refs.len(),
            data.relations.len(),
            data.include_graph.len()
        );
        Ok(data)
    }

    fn chunk(&self, id: ChunkId) -> Option<&[u8]> {
        let data = self.container.get(id);
        if data.is_none() {
            debug!("No '{}' chunk in shard", id);
        }
        data
    }
}
