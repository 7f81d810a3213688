//! Shard file naming.
//!
//! clangd stores the shard of a source file as `<basename>.<HASH>.idx`, where HASH is
//! the 16 uppercase hex digits of a 64-bit hash of the full source path. The hash
//! function changed with format 19:
//!
//! | Version | Hash               |
//! |---------|--------------------|
//! | <= 18   | xxHash64, seed 0   |
//! | 19, 20  | XXH3-64            |

use twox_hash::{XxHash3_64, XxHash64};

/// Last format version that names shards with xxHash64.
const LAST_XXHASH64_VERSION: u32 = 18;

/// Hashes a source path the way the producer of the given format version does.
pub fn compute_file_hash(path: &str, format_version: u32) -> u64 {
    if format_version <= LAST_XXHASH64_VERSION {
        XxHash64::oneshot(0, path.as_bytes())
    } else {
        XxHash3_64::oneshot(path.as_bytes())
    }
}

/// The shard file name for a source path, e.g. `main.cpp.29BD10997380DC29.idx`.
pub fn shard_file_name(path: &str, format_version: u32) -> String {
    let basename = path.rsplit(['/', '\\']).next().unwrap_or(path);
    format!(
        "{}.{:016X}.idx",
        basename,
        compute_file_hash(path, format_version)
    )
}

/// A shard file name split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardName {
    pub basename: String,
    /// The hash exactly as written in the file name.
    pub hash: String,
}

impl ShardName {
    /// Splits `basename.HASH.idx`. Returns `None` for any other shape.
    pub fn parse(file_name: &str) -> Option<Self> {
        let mut parts = file_name.rsplitn(3, '.');
        let extension = parts.next()?;
        let hash = parts.next()?;
        let basename = parts.next()?;
        if extension != "idx" || hash.is_empty() || basename.is_empty() {
            return None;
        }
        Some(Self {
            basename: basename.to_string(),
            hash: hash.to_string(),
        })
    }

    /// The hash as a number, if it is valid hex.
    pub fn hash_value(&self) -> Option<u64> {
        u64::from_str_radix(&self.hash, 16).ok()
    }

    /// Whether this name is the one `source_path` gets under `format_version`.
    pub fn matches(&self, source_path: &str, format_version: u32) -> bool {
        self.hash_value() == Some(compute_file_hash(source_path, format_version))
    }
}
