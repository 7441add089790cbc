//! Shared constants used across blobdepot crates.

/// Window size for chunked content hashing (2 MiB).
/// Blobs are folded into the digest one window at a time so inputs larger
/// than memory can still be hashed.
pub const HASH_CHUNK_SIZE: usize = 2 * 1024 * 1024;

/// Cache lifetime applied to uploaded objects, in seconds.
pub const UPLOAD_CACHE_MAX_AGE_SECS: u64 = 3600;

/// `Expires` header value applied to uploaded objects, in milliseconds.
pub const UPLOAD_EXPIRES_MS: u64 = 3_600_000;

/// Default expiry for signed URLs, in seconds (one year).
pub const DEFAULT_SIGN_EXPIRY_SECS: u64 = 31_536_000;
