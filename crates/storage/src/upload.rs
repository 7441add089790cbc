//! Dedup upload pipeline.
//!
//! A single upload call runs a linear pipeline: stream-hash the blob in
//! fixed windows, derive a content-addressed key, ask the store whether
//! that key already exists, and upload only when it does not. Identical
//! content under the same folder therefore never uploads twice.
//!
//! The surrounding [`RequestLedger`] brackets every call for loading-state
//! bookkeeping, on the error path included.
//!
//! # Example
//!
//! ```ignore
//! use blobdepot_storage::{Blob, FolderSpec, RequestLedger, Uploader};
//!
//! let ledger = RequestLedger::new();
//! let uploader = Uploader::new(&client, &ledger);
//! let outcome = uploader
//!     .upload(&FolderSpec::prefix("images"), &Blob::from_file("cat.png"))
//!     .await?;
//! println!("stored as {}", outcome.key);
//! ```

use tokio::io::AsyncReadExt;

use blobdepot_common::constants::HASH_CHUNK_SIZE;
use blobdepot_common::hash::Md5Hasher;
use blobdepot_common::name_utils::file_suffix;

use crate::error::StorageError;
use crate::key::{object_key, FolderSpec};
use crate::ledger::RequestLedger;
use crate::sign::{self, SignOptions};
use crate::traits::{ObjectInfo, ObjectStore, PutOutcome};
use crate::types::{Blob, DataSource, PutMetadata};

/// Options for upload operations.
#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// Window size for chunked hashing.
    pub chunk_size: usize,
    /// Metadata headers applied to uploaded objects.
    pub metadata: PutMetadata,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            chunk_size: HASH_CHUNK_SIZE,
            metadata: PutMetadata::default(),
        }
    }
}

impl UploadOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hashing window size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the metadata headers applied to uploads.
    pub fn with_metadata(mut self, metadata: PutMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Ledger payload describing an in-flight upload.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    /// File name of the blob being uploaded.
    pub name: String,
}

/// Result of one upload call.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    /// Final storage key of the content.
    pub key: String,
    /// Whether an existing object was reused instead of uploading.
    pub deduplicated: bool,
    /// Bytes folded into the content digest.
    pub bytes_hashed: u64,
}

/// A stored object together with its signed access URL.
///
/// Mirrors the two companion form fields the surrounding UI fills:
/// the raw key and its signed-URL form.
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// Raw storage key.
    pub key: String,
    /// Signed, time-limited access URL.
    pub url: String,
}

/// High-level dedup upload operations over any [`ObjectStore`] backend.
pub struct Uploader<'a, C: ObjectStore> {
    /// The store client.
    client: &'a C,
    /// Shared request ledger bracketing every call.
    ledger: &'a RequestLedger<PendingUpload>,
    /// Upload options.
    options: UploadOptions,
}

impl<'a, C: ObjectStore> Uploader<'a, C> {
    /// Create a new uploader.
    ///
    /// # Arguments
    /// * `client` - Store client for list/put/sign operations
    /// * `ledger` - Shared in-flight request ledger
    pub fn new(client: &'a C, ledger: &'a RequestLedger<PendingUpload>) -> Self {
        Self {
            client,
            ledger,
            options: UploadOptions::default(),
        }
    }

    /// Set upload options.
    pub fn with_options(mut self, options: UploadOptions) -> Self {
        self.options = options;
        self
    }

    /// The shared request ledger.
    pub fn ledger(&self) -> &RequestLedger<PendingUpload> {
        self.ledger
    }

    /// Upload a blob, reusing an existing object with identical content.
    ///
    /// The final key is `prefix/[dateBucket/]<digest><original-ext>`. When
    /// the store already holds an object under that key the first listed
    /// name is returned and nothing is written.
    ///
    /// Two concurrent uploads of the same new content may both observe an
    /// empty listing and both write; last write wins.
    ///
    /// # Arguments
    /// * `folder` - Target folder for the derived key
    /// * `blob` - Content to store
    ///
    /// # Returns
    /// The final storage key plus whether the upload was skipped.
    pub async fn upload(
        &self,
        folder: &FolderSpec,
        blob: &Blob,
    ) -> Result<UploadOutcome, StorageError> {
        let handle = self.ledger.begin(
            PendingUpload {
                name: blob.name.clone(),
            },
            true,
        );

        let result: Result<UploadOutcome, StorageError> = self.upload_inner(folder, blob).await;

        // Ledger cleanup runs on success and failure alike.
        self.ledger.end(&handle);
        result
    }

    /// Upload from an optional selection, failing when nothing was chosen.
    ///
    /// # Arguments
    /// * `folder` - Target folder for the derived key
    /// * `selection` - The chosen blob, if any
    pub async fn upload_selection(
        &self,
        folder: &FolderSpec,
        selection: Option<&Blob>,
    ) -> Result<UploadOutcome, StorageError> {
        let blob: &Blob = selection.ok_or(StorageError::NoFileSelected)?;
        self.upload(folder, blob).await
    }

    /// Upload a blob and sign its final key in one call.
    ///
    /// # Arguments
    /// * `folder` - Target folder for the derived key
    /// * `blob` - Content to store
    /// * `sign_options` - Options for the signed URL
    pub async fn upload_signed(
        &self,
        folder: &FolderSpec,
        blob: &Blob,
        sign_options: &SignOptions,
    ) -> Result<StoredObject, StorageError> {
        let outcome: UploadOutcome = self.upload(folder, blob).await?;
        let url: String = self.sign(&outcome.key, sign_options).await?;
        Ok(StoredObject {
            key: outcome.key,
            url,
        })
    }

    /// Produce a time-limited access URL for a stored key.
    ///
    /// Empty keys and already-qualified URLs pass through unchanged.
    pub async fn sign(&self, name: &str, options: &SignOptions) -> Result<String, StorageError> {
        sign::sign(self.client, name, options).await
    }

    async fn upload_inner(
        &self,
        folder: &FolderSpec,
        blob: &Blob,
    ) -> Result<UploadOutcome, StorageError> {
        let (digest, bytes_hashed) =
            digest_source(&blob.name, &blob.source, self.options.chunk_size).await?;

        let object_name: String = format!("{digest}{}", file_suffix(&blob.name, true, ""));
        let key: String = object_key(folder, Some(&object_name), false);

        let listing: Vec<ObjectInfo> = self.client.list_objects(&key).await?;
        if let Some(existing) = listing.first() {
            log::debug!("content for {key} already stored as {}", existing.name);
            return Ok(UploadOutcome {
                key: existing.name.clone(),
                deduplicated: true,
                bytes_hashed,
            });
        }

        let outcome: PutOutcome = self
            .client
            .put_object(&key, &blob.source, &self.options.metadata)
            .await?;
        log::debug!("uploaded {} ({bytes_hashed} bytes) as {}", blob.name, outcome.name);

        Ok(UploadOutcome {
            key: outcome.name,
            deduplicated: false,
            bytes_hashed,
        })
    }
}

/// Fold a data source into its content digest, one window at a time.
///
/// Window N+1 is never read before window N is folded, so the digest is
/// identical to hashing the full byte sequence in one unit.
///
/// # Arguments
/// * `name` - Blob name, for error reporting
/// * `source` - Bytes to hash
/// * `chunk_size` - Window size; `0` falls back to [`HASH_CHUNK_SIZE`]
///
/// # Returns
/// The hex digest and the number of bytes hashed.
pub async fn digest_source(
    name: &str,
    source: &DataSource,
    chunk_size: usize,
) -> Result<(String, u64), StorageError> {
    let window: usize = if chunk_size == 0 {
        HASH_CHUNK_SIZE
    } else {
        chunk_size
    };

    match source {
        DataSource::Bytes(data) => {
            let mut hasher: Md5Hasher = Md5Hasher::new();
            for chunk in data.chunks(window) {
                hasher.update(chunk);
            }
            Ok((hasher.finish_hex(), data.len() as u64))
        }
        DataSource::FilePath(path) => {
            let mut file: tokio::fs::File = tokio::fs::File::open(path)
                .await
                .map_err(|e| StorageError::read_failure(name, e))?;

            let mut hasher: Md5Hasher = Md5Hasher::new();
            let mut buffer: Vec<u8> = vec![0u8; window];
            let mut total: u64 = 0;

            loop {
                let bytes_read: usize = file
                    .read(&mut buffer)
                    .await
                    .map_err(|e| StorageError::read_failure(name, e))?;
                if bytes_read == 0 {
                    break;
                }
                hasher.update(&buffer[..bytes_read]);
                total += bytes_read as u64;
            }

            Ok((hasher.finish_hex(), total))
        }
    }
}
