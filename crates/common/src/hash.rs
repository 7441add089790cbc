//! Content digest computation.
//!
//! Object keys are content-addressed: the digest of a blob's full byte
//! sequence becomes its storage name. Hashing is a strict sequential fold
//! over fixed windows, so the digest never depends on how the byte stream
//! was chunked.

use std::io::Read;

use md5::{Digest, Md5};

use crate::constants::HASH_CHUNK_SIZE;

/// Compute the MD5 digest of a byte slice.
///
/// # Arguments
/// * `data` - Bytes to hash
///
/// # Returns
/// 32-character lowercase hex string (128 bits).
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher: Md5Hasher = Md5Hasher::new();
    hasher.update(data);
    hasher.finish_hex()
}

/// Compute the MD5 digest of a reader by folding fixed-size windows.
///
/// Reads `chunk_size` bytes at a time so arbitrarily large inputs never
/// have to fit in memory. The final window may be shorter than
/// `chunk_size`.
///
/// # Arguments
/// * `reader` - Source of bytes to hash
/// * `chunk_size` - Window size in bytes; `0` falls back to [`HASH_CHUNK_SIZE`]
///
/// # Returns
/// 32-character lowercase hex string (128 bits).
///
/// # Errors
/// Returns the underlying error if any window fails to read; no partial
/// digest is surfaced.
pub fn hash_reader<R: Read>(mut reader: R, chunk_size: usize) -> Result<String, std::io::Error> {
    let window: usize = if chunk_size == 0 {
        HASH_CHUNK_SIZE
    } else {
        chunk_size
    };

    let mut hasher: Md5Hasher = Md5Hasher::new();
    let mut buffer: Vec<u8> = vec![0u8; window];

    loop {
        let bytes_read: usize = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finish_hex())
}

/// Streaming hasher for incremental MD5 digests.
///
/// Use this when bytes arrive one chunk at a time, such as when hashing
/// while reading a file window by window.
pub struct Md5Hasher {
    inner: Md5,
}

impl Md5Hasher {
    /// Create a new streaming hasher.
    pub fn new() -> Self {
        Self { inner: Md5::new() }
    }

    /// Update the hasher with additional data.
    ///
    /// # Arguments
    /// * `data` - Bytes to add to the digest computation
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Finalize and return the digest as raw bytes.
    pub fn finish(self) -> [u8; 16] {
        self.inner.finalize().into()
    }

    /// Finalize and return the digest as a 32-char hex string.
    pub fn finish_hex(self) -> String {
        self.finish().iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl Default for Md5Hasher {
    fn default() -> Self {
        Self::new()
    }
}
