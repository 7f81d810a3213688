//! Decoder for the `cmdl` chunk.
//!
//! ```text
//! [varint]     Working directory string index
//! [varint]     Argument count N
//! [N x varint] Argument string indices
//! ```
//!
//! Unlike the appendable chunks, the command is a single record: a truncated chunk
//! is an error rather than a shorter result.

use log::debug;

use super::read_string;
use crate::idx::format::string_table::StringTable;
use crate::idx::types::error::Result;
use crate::idx::types::models::CompileCommand;
use crate::idx::utils;

/// Decodes the compile command. An empty chunk holds no command.
pub fn decode(data: &[u8], strings: &StringTable) -> Result<Option<CompileCommand>> {
    if data.is_empty() {
        return Ok(None);
    }

    let mut reader = data;
    let directory = read_string(&mut reader, strings)?;
    let count = utils::read_varint(&mut reader)?;
    let mut arguments = Vec::with_capacity((count as usize).min(reader.len()));
    for _ in 0..count {
        arguments.push(read_string(&mut reader, strings)?);
    }

    debug!("Decoded compile command with {} arguments", arguments.len());
    Ok(Some(CompileCommand {
        directory,
        arguments,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idx::types::error::IdxError;

    fn strings() -> StringTable {
        StringTable::from_blob(b"\0/home/user/build\0clang++\0-std=c++17\0main.cpp\0")
    }

    #[test]
    fn decodes_command() {
        let command = decode(&[1, 3, 2, 3, 4], &strings()).unwrap().unwrap();
        assert_eq!(command.directory, "/home/user/build");
        assert_eq!(command.arguments, vec!["clang++", "-std=c++17", "main.cpp"]);
    }

    #[test]
    fn empty_chunk_has_no_command() {
        assert_eq!(decode(&[], &strings()).unwrap(), None);
    }

    #[test]
    fn truncated_command_is_an_error() {
        assert!(matches!(
            decode(&[1, 3, 2], &strings()),
            Err(IdxError::UnexpectedEndOfData { .. })
        ));
    }
}
