//! Core data structures for clangd index shard components.
//!
//! This module defines the fundamental types used throughout the library:
//! - Chunk identifiers of the RIFF envelope
//! - Symbol, reference, relation and include-graph records
//! - Closed enumerations with an `Unknown(raw)` escape for forward compatibility

use std::collections::HashMap;
use std::fmt;

use crate::idx::naming::ShardName;

/// A four-byte RIFF chunk tag such as `meta` or `symb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkId(pub [u8; 4]);

impl ChunkId {
    /// Format metadata; holds the little-endian format version.
    pub const META: ChunkId = ChunkId(*b"meta");
    /// Interned string pool, optionally zlib-compressed.
    pub const STRI: ChunkId = ChunkId(*b"stri");
    pub const SYMB: ChunkId = ChunkId(*b"symb");
    pub const REFS: ChunkId = ChunkId(*b"refs");
    pub const RELA: ChunkId = ChunkId(*b"rela");
    /// Include graph ("sources").
    pub const SRCS: ChunkId = ChunkId(*b"srcs");
    /// Compile command.
    pub const CMDL: ChunkId = ChunkId(*b"cmdl");

    /// Whether this is one of the chunk ids the decoder understands.
    pub fn is_known(&self) -> bool {
        matches!(
            *self,
            ChunkId::META
                | ChunkId::STRI
                | ChunkId::SYMB
                | ChunkId::REFS
                | ChunkId::RELA
                | ChunkId::SRCS
                | ChunkId::CMDL
        )
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// Opaque 8-byte symbol identifier, the join key across symbols, refs and relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SymbolId(pub [u8; 8]);

impl SymbolId {
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    /// Lowercase hex rendering, 16 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A source range with its file URI already resolved through the string table.
///
/// Lines and columns are 0-based, exactly as the producer wrote them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SymbolLocation {
    pub file_uri: String,
    pub start_line: u64,
    pub start_column: u64,
    pub end_line: u64,
    pub end_column: u64,
}

impl fmt::Display for SymbolLocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}-{}:{}",
            self.file_uri, self.start_line, self.start_column, self.end_line, self.end_column
        )
    }
}

/// Kind of an indexed symbol.
///
/// Raw values 1..=30 map to named variants. Everything else, including clangd's own
/// "unknown kind" value 0, is kept as `Unknown(raw)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Unknown(u8),
    Module,
    Namespace,
    NamespaceAlias,
    Macro,
    Enum,
    Struct,
    Class,
    Protocol,
    Extension,
    Union,
    TypeAlias,
    Function,
    Variable,
    Field,
    EnumConstant,
    InstanceMethod,
    ClassMethod,
    StaticMethod,
    InstanceProperty,
    ClassProperty,
    StaticProperty,
    Constructor,
    Destructor,
    ConversionFunction,
    Parameter,
    Using,
    TemplateTypeParm,
    TemplateTemplateParm,
    NonTypeTemplateParm,
    Concept,
}

/// Named kinds indexed by their raw value; slot 0 is clangd's "unknown".
const SYMBOL_KINDS: [SymbolKind; 31] = [
    SymbolKind::Unknown(0),
    SymbolKind::Module,
    SymbolKind::Namespace,
    SymbolKind::NamespaceAlias,
    SymbolKind::Macro,
    SymbolKind::Enum,
    SymbolKind::Struct,
    SymbolKind::Class,
    SymbolKind::Protocol,
    SymbolKind::Extension,
    SymbolKind::Union,
    SymbolKind::TypeAlias,
    SymbolKind::Function,
    SymbolKind::Variable,
    SymbolKind::Field,
    SymbolKind::EnumConstant,
    SymbolKind::InstanceMethod,
    SymbolKind::ClassMethod,
    SymbolKind::StaticMethod,
    SymbolKind::InstanceProperty,
    SymbolKind::ClassProperty,
    SymbolKind::StaticProperty,
    SymbolKind::Constructor,
    SymbolKind::Destructor,
    SymbolKind::ConversionFunction,
    SymbolKind::Parameter,
    SymbolKind::Using,
    SymbolKind::TemplateTypeParm,
    SymbolKind::TemplateTemplateParm,
    SymbolKind::NonTypeTemplateParm,
    SymbolKind::Concept,
];

impl SymbolKind {
    /// Returns the raw byte this kind was decoded from.
    pub fn as_u8(&self) -> u8 {
        match self {
            SymbolKind::Unknown(raw) => *raw,
            named => SYMBOL_KINDS
                .iter()
                .position(|k| k == named)
                .map(|pos| pos as u8)
                .unwrap_or_default(),
        }
    }
}

impl From<u8> for SymbolKind {
    fn from(value: u8) -> Self {
        SYMBOL_KINDS
            .get(value as usize)
            .copied()
            .unwrap_or(SymbolKind::Unknown(value))
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SymbolKind::Unknown(0) => write!(f, "Unknown"),
            SymbolKind::Unknown(raw) => write!(f, "Unknown_{}", raw),
            named => write!(f, "{:?}", named),
        }
    }
}

/// Source language of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolLanguage {
    C,
    ObjC,
    Cxx,
    Swift,
    Unknown(u8),
}

impl SymbolLanguage {
    pub fn as_u8(&self) -> u8 {
        match self {
            SymbolLanguage::C => 0,
            SymbolLanguage::ObjC => 1,
            SymbolLanguage::Cxx => 2,
            SymbolLanguage::Swift => 3,
            SymbolLanguage::Unknown(raw) => *raw,
        }
    }
}

impl From<u8> for SymbolLanguage {
    fn from(value: u8) -> Self {
        match value {
            0 => SymbolLanguage::C,
            1 => SymbolLanguage::ObjC,
            2 => SymbolLanguage::Cxx,
            3 => SymbolLanguage::Swift,
            other => SymbolLanguage::Unknown(other),
        }
    }
}

impl fmt::Display for SymbolLanguage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SymbolLanguage::C => write!(f, "C"),
            SymbolLanguage::ObjC => write!(f, "ObjC"),
            SymbolLanguage::Cxx => write!(f, "CXX"),
            SymbolLanguage::Swift => write!(f, "Swift"),
            SymbolLanguage::Unknown(raw) => write!(f, "Unknown_{}", raw),
        }
    }
}

/// Per-symbol flag byte.
///
/// Bits the decoder does not know about are preserved in the raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SymbolFlags(pub u8);

impl SymbolFlags {
    pub const INDEXED_FOR_CODE_COMPLETION: u8 = 1 << 0;
    pub const DEPRECATED: u8 = 1 << 1;
    pub const IMPLEMENTATION_DETAIL: u8 = 1 << 2;
    pub const VISIBLE_OUTSIDE_FILE: u8 = 1 << 3;
    pub const HAS_DOC_COMMENT: u8 = 1 << 4;

    const NAMES: [(u8, &'static str); 5] = [
        (Self::INDEXED_FOR_CODE_COMPLETION, "IndexedForCodeCompletion"),
        (Self::DEPRECATED, "Deprecated"),
        (Self::IMPLEMENTATION_DETAIL, "ImplementationDetail"),
        (Self::VISIBLE_OUTSIDE_FILE, "VisibleOutsideFile"),
        (Self::HAS_DOC_COMMENT, "HasDocComment"),
    ];

    pub fn contains(&self, flag: u8) -> bool {
        self.0 & flag == flag
    }

    /// Names of the known flags that are set, lowest bit first.
    pub fn names(&self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(bit, _)| self.contains(*bit))
            .map(|(_, name)| *name)
            .collect()
    }
}

/// Which preprocessor directives may be used to pull in an include header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncludeDirective {
    Invalid,
    Include,
    Import,
    Unknown(u8),
}

impl From<u8> for IncludeDirective {
    fn from(value: u8) -> Self {
        match value {
            0 => IncludeDirective::Invalid,
            1 => IncludeDirective::Include,
            2 => IncludeDirective::Import,
            other => IncludeDirective::Unknown(other),
        }
    }
}

impl fmt::Display for IncludeDirective {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IncludeDirective::Unknown(raw) => write!(f, "Dir:{}", raw),
            named => write!(f, "{:?}", named),
        }
    }
}

/// A header that provides a symbol, with the number of times it was included for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeHeader {
    pub header: String,
    pub references: u64,
    pub directive: IncludeDirective,
}

/// A decoded record of the `symb` chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub id: SymbolId,
    pub kind: SymbolKind,
    pub language: SymbolLanguage,
    pub name: String,
    pub scope: String,
    pub template_specialization_args: String,
    /// `None` when the producer recorded no definition (file index 0).
    pub definition: Option<SymbolLocation>,
    pub canonical_declaration: Option<SymbolLocation>,
    pub references: u64,
    pub flags: SymbolFlags,
    pub signature: String,
    pub completion_snippet_suffix: String,
    pub documentation: String,
    pub return_type: String,
    pub type_name: String,
    pub include_headers: Vec<IncludeHeader>,
}

/// Reference kind bitmask. Values combine by OR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RefKind(pub u8);

impl RefKind {
    pub const DECLARATION: u8 = 1 << 0;
    pub const DEFINITION: u8 = 1 << 1;
    pub const REFERENCE: u8 = 1 << 2;
    pub const SPELLED: u8 = 1 << 3;
    pub const CALL: u8 = 1 << 4;

    const NAMES: [(u8, &'static str); 5] = [
        (Self::DECLARATION, "Declaration"),
        (Self::DEFINITION, "Definition"),
        (Self::REFERENCE, "Reference"),
        (Self::SPELLED, "Spelled"),
        (Self::CALL, "Call"),
    ];

    pub fn contains(&self, kind: u8) -> bool {
        self.0 & kind == kind
    }

    pub fn names(&self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(bit, _)| self.contains(*bit))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "Unknown");
        }
        let names = self.names();
        if names.is_empty() {
            write!(f, "Unknown({})", self.0)
        } else {
            write!(f, "{}", names.join("|"))
        }
    }
}

/// A decoded record of the `refs` chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub kind: RefKind,
    pub location: SymbolLocation,
    /// The enclosing symbol; only written by format 13 and later.
    pub container: Option<SymbolId>,
}

/// References grouped by the symbol they point at, in chunk order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RefMap {
    groups: Vec<(SymbolId, Vec<Reference>)>,
    by_id: HashMap<SymbolId, usize>,
}

impl RefMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a group. A repeated id replaces the earlier group's contents in place.
    pub fn insert(&mut self, id: SymbolId, refs: Vec<Reference>) {
        match self.by_id.get(&id) {
            Some(&slot) => self.groups[slot].1 = refs,
            None => {
                self.by_id.insert(id, self.groups.len());
                self.groups.push((id, refs));
            }
        }
    }

    pub fn get(&self, id: &SymbolId) -> Option<&[Reference]> {
        self.by_id
            .get(id)
            .map(|&slot| self.groups[slot].1.as_slice())
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of references across all symbols.
    pub fn total_refs(&self) -> usize {
        self.groups.iter().map(|(_, refs)| refs.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SymbolId, &[Reference])> {
        self.groups.iter().map(|(id, refs)| (id, refs.as_slice()))
    }
}

/// Relation predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    BaseOf,
    OverriddenBy,
    Unknown(u8),
}

impl From<u8> for RelationKind {
    fn from(value: u8) -> Self {
        match value {
            0 => RelationKind::BaseOf,
            1 => RelationKind::OverriddenBy,
            other => RelationKind::Unknown(other),
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RelationKind::BaseOf => write!(f, "BaseOf"),
            RelationKind::OverriddenBy => write!(f, "OverriddenBy"),
            RelationKind::Unknown(raw) => write!(f, "Unknown_{}", raw),
        }
    }
}

/// A decoded record of the `rela` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Relation {
    pub subject: SymbolId,
    pub predicate: RelationKind,
    pub object: SymbolId,
}

/// A decoded record of the `srcs` chunk: one file of the include graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeGraphNode {
    /// Bit 0: translation unit. Bit 1: had compile errors.
    pub flags: u8,
    pub uri: String,
    /// Content hash used by clangd for staleness detection.
    pub digest: [u8; 8],
    pub direct_includes: Vec<String>,
}

impl IncludeGraphNode {
    pub const IS_TU: u8 = 1 << 0;
    pub const HAD_ERRORS: u8 = 1 << 1;

    pub fn is_translation_unit(&self) -> bool {
        self.flags & Self::IS_TU != 0
    }

    pub fn had_errors(&self) -> bool {
        self.flags & Self::HAD_ERRORS != 0
    }
}

/// The compile command the shard was produced with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompileCommand {
    pub directory: String,
    pub arguments: Vec<String>,
}

/// Everything decoded from a single shard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexData {
    pub format_version: u32,
    pub symbols: Vec<Symbol>,
    pub refs: RefMap,
    pub relations: Vec<Relation>,
    pub include_graph: Vec<IncludeGraphNode>,
    pub command: Option<CompileCommand>,
}

impl IndexData {
    /// Include-graph nodes flagged as translation units, in chunk order.
    pub fn translation_units(&self) -> Vec<&IncludeGraphNode> {
        self.include_graph
            .iter()
            .filter(|node| node.is_translation_unit())
            .collect()
    }

    pub fn find_node_by_uri(&self, uri: &str) -> Option<&IncludeGraphNode> {
        self.include_graph.iter().find(|node| node.uri == uri)
    }

    pub fn find_symbol(&self, id: &SymbolId) -> Option<&Symbol> {
        self.symbols.iter().find(|symbol| symbol.id == *id)
    }

    pub fn refs_for(&self, id: &SymbolId) -> &[Reference] {
        self.refs.get(id).unwrap_or_default()
    }
}

/// File-level metadata about an opened shard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Final path component, if the shard was opened from a path.
    pub file_name: Option<String>,
    pub format_version: u32,
    /// Chunk ids with their payload sizes, in file order.
    pub chunks: Vec<(ChunkId, usize)>,
    /// Basename and hash parsed from a `<basename>.<HASH>.idx` file name.
    pub shard: Option<ShardName>,
}
