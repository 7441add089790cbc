//! Shared types and utilities for blobdepot.
//!
//! This crate provides the pieces used across blobdepot crates:
//! - Chunked content hashing (streaming MD5 fold)
//! - File-name/suffix helpers for object key construction
//! - Shared constants

pub mod constants;
pub mod hash;
pub mod name_utils;

// Re-export commonly used items at crate root
pub use constants::*;
pub use hash::{hash_bytes, hash_reader, Md5Hasher};
pub use name_utils::{file_suffix, random_object_name};
