//! Shared data structures for storage operations.

use std::path::Path;

use serde::{Deserialize, Serialize};

use blobdepot_common::constants::{UPLOAD_CACHE_MAX_AGE_SECS, UPLOAD_EXPIRES_MS};

use crate::error::StorageError;

/// Connection settings for a backing object store.
///
/// The pipeline never interprets these; backends consume them when they
/// build their transport. Loadable from configuration via serde.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Store region identifier (e.g. `oss-cn-beijing`, `us-west-2`).
    pub region: String,
    /// Access key id.
    pub access_key_id: String,
    /// Access key secret.
    pub access_key_secret: String,
    /// Optional STS session token.
    pub sts_token: Option<String>,
    /// Bucket name.
    pub bucket: String,
    /// Optional custom endpoint, overriding the region default.
    pub endpoint: Option<String>,
    /// Use HTTPS.
    pub secure: bool,
    /// Transport timeout in milliseconds, if the backend enforces one.
    pub timeout_ms: Option<u64>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            region: String::new(),
            access_key_id: String::new(),
            access_key_secret: String::new(),
            sts_token: None,
            bucket: String::new(),
            endpoint: None,
            secure: true,
            timeout_ms: None,
        }
    }
}

impl StoreSettings {
    /// Copy these settings with individual fields overridden.
    ///
    /// # Arguments
    /// * `patch` - Fields to replace; `None` fields keep the current value
    pub fn merged(&self, patch: StoreSettingsPatch) -> Self {
        Self {
            region: patch.region.unwrap_or_else(|| self.region.clone()),
            access_key_id: patch
                .access_key_id
                .unwrap_or_else(|| self.access_key_id.clone()),
            access_key_secret: patch
                .access_key_secret
                .unwrap_or_else(|| self.access_key_secret.clone()),
            sts_token: patch.sts_token.or_else(|| self.sts_token.clone()),
            bucket: patch.bucket.unwrap_or_else(|| self.bucket.clone()),
            endpoint: patch.endpoint.or_else(|| self.endpoint.clone()),
            secure: patch.secure.unwrap_or(self.secure),
            timeout_ms: patch.timeout_ms.or(self.timeout_ms),
        }
    }
}

/// Partial settings overlay for [`StoreSettings::merged`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSettingsPatch {
    pub region: Option<String>,
    pub access_key_id: Option<String>,
    pub access_key_secret: Option<String>,
    pub sts_token: Option<String>,
    pub bucket: Option<String>,
    pub endpoint: Option<String>,
    pub secure: Option<bool>,
    pub timeout_ms: Option<u64>,
}

/// Metadata headers applied to uploaded objects.
#[derive(Debug, Clone)]
pub struct PutMetadata {
    /// `Content-Disposition` header value.
    pub content_disposition: String,
    /// `Cache-Control` header value.
    pub cache_control: String,
    /// `Expires` header value.
    pub expires: String,
}

impl Default for PutMetadata {
    fn default() -> Self {
        Self {
            content_disposition: "inline".into(),
            cache_control: format!("max-age={UPLOAD_CACHE_MAX_AGE_SECS}"),
            expires: UPLOAD_EXPIRES_MS.to_string(),
        }
    }
}

/// Source of data for hashing and upload.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// Read from file at path.
    FilePath(String),
    /// In-memory bytes.
    Bytes(Vec<u8>),
}

/// A named binary blob submitted for upload.
///
/// Consumed once per upload call; the pipeline reads it in fixed windows
/// while hashing and hands the source to the backend for the write.
#[derive(Debug, Clone)]
pub struct Blob {
    /// File name the blob was selected under; its extension survives into
    /// the derived object key.
    pub name: String,
    /// Where the bytes live.
    pub source: DataSource,
}

impl Blob {
    /// Create a blob backed by in-memory bytes.
    ///
    /// # Arguments
    /// * `name` - File name (extension is kept for key derivation)
    /// * `data` - Blob contents
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            source: DataSource::Bytes(data),
        }
    }

    /// Create a blob backed by a file on disk, named after the file.
    ///
    /// # Arguments
    /// * `path` - Path to the file
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        let path: &Path = path.as_ref();
        let name: String = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            source: DataSource::FilePath(path.to_string_lossy().into_owned()),
        }
    }

    /// Byte length of the blob.
    ///
    /// # Errors
    /// Returns a read failure if a file-backed blob cannot be stat'd.
    pub async fn size(&self) -> Result<u64, StorageError> {
        match &self.source {
            DataSource::Bytes(data) => Ok(data.len() as u64),
            DataSource::FilePath(path) => tokio::fs::metadata(path)
                .await
                .map(|m| m.len())
                .map_err(|e| StorageError::read_failure(&self.name, e)),
        }
    }
}
