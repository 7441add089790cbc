//! Storage traits/interfaces for object store operations.
//!
//! The real store client (cloud SDK, HTTP transport, auth) lives behind
//! [`ObjectStore`]; the pipeline only depends on this seam.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::sign::SignOptions;
use crate::types::{DataSource, PutMetadata};

/// Information about a stored object from list operations.
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    /// Object key.
    pub name: String,
    /// Object size in bytes, when the backend reports it.
    pub size: Option<u64>,
    /// Last modified timestamp (Unix epoch seconds).
    pub last_modified: Option<i64>,
    /// ETag, when the backend reports it.
    pub etag: Option<String>,
}

impl ObjectInfo {
    /// Create an entry carrying only a name.
    ///
    /// # Arguments
    /// * `name` - Object key
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: None,
            last_modified: None,
            etag: None,
        }
    }
}

/// Result of a successful object write.
#[derive(Debug, Clone)]
pub struct PutOutcome {
    /// Key the object was stored under.
    pub name: String,
    /// Direct URL to the object, when the backend reports one.
    pub url: Option<String>,
}

/// Low-level object store operations - implemented by each backend.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List objects whose key starts with `prefix`.
    ///
    /// A non-empty listing for a derived key means the content is already
    /// durably stored.
    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectInfo>, StorageError>;

    /// Store a blob under `key` with the given metadata headers.
    async fn put_object(
        &self,
        key: &str,
        source: &DataSource,
        metadata: &PutMetadata,
    ) -> Result<PutOutcome, StorageError>;

    /// Produce a time-limited signed URL for `key`.
    ///
    /// Callers go through [`crate::sign::sign`], which handles the
    /// passthrough cases; backends only ever see plain keys here.
    async fn signature_url(&self, key: &str, options: &SignOptions)
        -> Result<String, StorageError>;
}
