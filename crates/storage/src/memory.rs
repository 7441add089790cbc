//! In-memory object store backend.
//!
//! A process-local [`ObjectStore`] used in tests and examples. Objects
//! live in an ordered map; signature URLs are deterministic fakes carrying
//! the same query parameters a real backend would attach.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use blobdepot_common::hash::hash_bytes;

use crate::error::StorageError;
use crate::sign::SignOptions;
use crate::traits::{ObjectInfo, ObjectStore, PutOutcome};
use crate::types::{DataSource, PutMetadata};

/// A stored object with its metadata headers.
#[derive(Debug, Clone)]
pub struct StoredEntry {
    /// Object contents.
    pub data: Vec<u8>,
    /// Metadata headers supplied at put time.
    pub metadata: PutMetadata,
}

/// Object store holding everything in process memory.
pub struct MemoryObjectStore {
    /// Bucket name, used in fake signature URLs.
    bucket: String,
    objects: Mutex<BTreeMap<String, StoredEntry>>,
    put_calls: AtomicU64,
    list_calls: AtomicU64,
}

impl MemoryObjectStore {
    /// Create an empty store.
    ///
    /// # Arguments
    /// * `bucket` - Bucket name used in generated URLs
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Mutex::new(BTreeMap::new()),
            put_calls: AtomicU64::new(0),
            list_calls: AtomicU64::new(0),
        }
    }

    fn objects(&self) -> MutexGuard<'_, BTreeMap<String, StoredEntry>> {
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of `put_object` calls served so far.
    pub fn put_calls(&self) -> u64 {
        self.put_calls.load(Ordering::Relaxed)
    }

    /// Number of `list_objects` calls served so far.
    pub fn list_calls(&self) -> u64 {
        self.list_calls.load(Ordering::Relaxed)
    }

    /// Number of stored objects.
    pub fn object_count(&self) -> usize {
        self.objects().len()
    }

    /// Fetch a stored object by exact key.
    pub fn get(&self, key: &str) -> Option<StoredEntry> {
        self.objects().get(key).cloned()
    }

    /// Insert an object directly, bypassing the upload pipeline.
    ///
    /// # Arguments
    /// * `key` - Object key
    /// * `data` - Object contents
    pub fn insert(&self, key: impl Into<String>, data: Vec<u8>) {
        self.objects().insert(
            key.into(),
            StoredEntry {
                data,
                metadata: PutMetadata::default(),
            },
        );
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectInfo>, StorageError> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);
        let objects = self.objects();
        let listing: Vec<ObjectInfo> = objects
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, entry)| ObjectInfo {
                name: key.clone(),
                size: Some(entry.data.len() as u64),
                last_modified: None,
                etag: None,
            })
            .collect();
        Ok(listing)
    }

    async fn put_object(
        &self,
        key: &str,
        source: &DataSource,
        metadata: &PutMetadata,
    ) -> Result<PutOutcome, StorageError> {
        self.put_calls.fetch_add(1, Ordering::Relaxed);

        let data: Vec<u8> = match source {
            DataSource::Bytes(data) => data.clone(),
            DataSource::FilePath(path) => tokio::fs::read(path)
                .await
                .map_err(|e| StorageError::read_failure(path.clone(), e))?,
        };

        self.objects().insert(
            key.to_string(),
            StoredEntry {
                data,
                metadata: metadata.clone(),
            },
        );

        Ok(PutOutcome {
            name: key.to_string(),
            url: None,
        })
    }

    async fn signature_url(
        &self,
        key: &str,
        options: &SignOptions,
    ) -> Result<String, StorageError> {
        // Deterministic fake signature; real backends derive this from
        // their credentials.
        let signature: String = hash_bytes(key.as_bytes())[..16].to_string();
        Ok(format!(
            "https://{}.store.invalid/{key}?Expires={}&Signature={signature}",
            self.bucket, options.expires_secs
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_objects_prefix_match() {
        let store: MemoryObjectStore = MemoryObjectStore::new("assets");
        store.insert("images/aa.png", vec![1]);
        store.insert("images/ab.png", vec![2]);
        store.insert("docs/aa.pdf", vec![3]);

        let listing: Vec<ObjectInfo> = store
            .list_objects("images/a")
            .await
            .expect("memory list cannot fail");
        let names: Vec<&str> = listing.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["images/aa.png", "images/ab.png"]);
    }

    #[tokio::test]
    async fn test_put_object_counts_calls() {
        let store: MemoryObjectStore = MemoryObjectStore::new("assets");
        let metadata: PutMetadata = PutMetadata::default();
        store
            .put_object("a/b.bin", &DataSource::Bytes(vec![1, 2, 3]), &metadata)
            .await
            .expect("memory put cannot fail");

        assert_eq!(store.put_calls(), 1);
        assert_eq!(store.object_count(), 1);
        let entry: StoredEntry = store.get("a/b.bin").expect("stored");
        assert_eq!(entry.data, vec![1, 2, 3]);
        assert_eq!(entry.metadata.content_disposition, "inline");
    }

    #[tokio::test]
    async fn test_signature_url_shape() {
        let store: MemoryObjectStore = MemoryObjectStore::new("assets");
        let url: String = store
            .signature_url("images/a.png", &SignOptions::new().with_expires_secs(900))
            .await
            .expect("memory sign cannot fail");
        assert!(url.starts_with("https://assets.store.invalid/images/a.png?"));
        assert!(url.contains("Expires=900"));
        assert!(url.contains("Signature="));
    }
}
