//! Core clangd index shard reader module

pub mod codec;
pub mod format;
pub mod naming;
pub mod reader;
pub mod types;
mod utils;

pub use reader::IdxReader;
pub use types::error::{IdxError, Result};
