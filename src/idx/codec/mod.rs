//! Codec layer for compression operations.
//!
//! # Submodules
//!
//! - [`compression`][]: zlib inflation of the string pool with size verification

pub mod compression;
