//! Format-version dispatch.
//!
//! Three layout generations exist between format 12 and format 20. They differ on
//! exactly two axes, both handled here so the record decoders stay version-agnostic:
//!
//! | Version | Reference container id | Include header references |
//! |---------|------------------------|---------------------------|
//! | 12      | absent                 | plain varint, directive = Include |
//! | 13..=17 | 8 bytes                | plain varint, directive = Include |
//! | 18..=20 | 8 bytes                | packed varint: `count << 2 \| directive` |

use std::fmt;

use log::debug;

use crate::idx::format::string_table::StringTable;
use crate::idx::types::error::{IdxError, Result};
use crate::idx::types::models::{IncludeDirective, IncludeHeader, SymbolId};
use crate::idx::utils;

/// Layout strategy, selected once per shard from the `meta` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatStrategy {
    V12,
    V13To17,
    V18Plus,
}

impl FormatStrategy {
    pub const MIN_VERSION: u32 = 12;
    pub const MAX_VERSION: u32 = 20;

    /// Reads the format version from the `meta` chunk and selects the strategy.
    pub fn from_meta(meta: &[u8]) -> Result<(u32, Self)> {
        let mut reader = meta;
        let version = utils::read_u32_le(&mut reader, "format version")?;
        let strategy = Self::try_from(version)?;
        debug!("Format version {} -> {} strategy", version, strategy);
        Ok((version, strategy))
    }

    /// Whether references carry the 8-byte id of their enclosing symbol.
    pub fn has_ref_container(&self) -> bool {
        !matches!(self, FormatStrategy::V12)
    }

    /// Reads the container field of a reference, if this layout has one.
    pub fn read_ref_container(&self, reader: &mut &[u8]) -> Result<Option<SymbolId>> {
        if self.has_ref_container() {
            Ok(Some(SymbolId(utils::read_array(reader, "reference container")?)))
        } else {
            Ok(None)
        }
    }

    /// Reads one include header entry of a symbol record.
    pub fn read_include_header(
        &self,
        reader: &mut &[u8],
        strings: &StringTable,
    ) -> Result<IncludeHeader> {
        let header = utils::read_varint(reader)?;
        let (references, directive) = match self {
            FormatStrategy::V12 | FormatStrategy::V13To17 => {
                (utils::read_varint(reader)?, IncludeDirective::Include)
            }
            FormatStrategy::V18Plus => unpack_include_references(utils::read_varint(reader)?),
        };

        Ok(IncludeHeader {
            header: strings.resolve(header),
            references,
            directive,
        })
    }
}

/// Splits the v18+ packed field into reference count and supported directive.
pub fn unpack_include_references(packed: u64) -> (u64, IncludeDirective) {
    (packed >> 2, IncludeDirective::from((packed & 0x3) as u8))
}

impl TryFrom<u32> for FormatStrategy {
    type Error = IdxError;
    fn try_from(version: u32) -> Result<Self> {
        match version {
            12 => Ok(Self::V12),
            13..=17 => Ok(Self::V13To17),
            18..=20 => Ok(Self::V18Plus),
            other => Err(IdxError::UnsupportedVersion(other)),
        }
    }
}

impl fmt::Display for FormatStrategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FormatStrategy::V12 => write!(f, "v12"),
            FormatStrategy::V13To17 => write!(f, "v13-17"),
            FormatStrategy::V18Plus => write!(f, "v18+"),
        }
    }
}
