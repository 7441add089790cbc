//! End-to-end tests for the dedup upload pipeline against the in-memory
//! backend.

use std::io::Write;

use async_trait::async_trait;
use chrono::Utc;

use blobdepot_common::hash::hash_bytes;
use blobdepot_storage::{
    Blob, DataSource, FolderSpec, MemoryObjectStore, ObjectInfo, ObjectStore, PutMetadata,
    PutOutcome, RequestLedger, SignOptions, StorageError, Uploader,
};

/// Store stub that fails either the existence query or the write.
struct FailingStore {
    fail_write: bool,
}

#[async_trait]
impl ObjectStore for FailingStore {
    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectInfo>, StorageError> {
        if self.fail_write {
            Ok(Vec::new())
        } else {
            Err(StorageError::QueryFailure {
                prefix: prefix.to_string(),
                message: "listing unavailable".into(),
            })
        }
    }

    async fn put_object(
        &self,
        key: &str,
        _source: &DataSource,
        _metadata: &PutMetadata,
    ) -> Result<PutOutcome, StorageError> {
        Err(StorageError::WriteFailure {
            key: key.to_string(),
            message: "write rejected".into(),
        })
    }

    async fn signature_url(
        &self,
        _key: &str,
        _options: &SignOptions,
    ) -> Result<String, StorageError> {
        unreachable!("signing is not exercised by these tests")
    }
}

#[tokio::test]
async fn upload_stores_under_digest_key() {
    let store = MemoryObjectStore::new("assets");
    let ledger = RequestLedger::new();
    let uploader = Uploader::new(&store, &ledger);

    let content: Vec<u8> = b"cat picture bytes".to_vec();
    let outcome = uploader
        .upload(&FolderSpec::prefix("images"), &Blob::from_bytes("cat.png", content.clone()))
        .await
        .expect("upload succeeds");

    let expected_key: String = format!("images/{}.png", hash_bytes(&content));
    assert_eq!(outcome.key, expected_key);
    assert!(!outcome.deduplicated);
    assert_eq!(outcome.bytes_hashed, content.len() as u64);

    let stored = store.get(&expected_key).expect("object stored");
    assert_eq!(stored.data, content);
    assert_eq!(stored.metadata.content_disposition, "inline");
    assert_eq!(stored.metadata.cache_control, "max-age=3600");
}

#[tokio::test]
async fn duplicate_content_uploads_once() {
    let store = MemoryObjectStore::new("assets");
    let ledger = RequestLedger::new();
    let uploader = Uploader::new(&store, &ledger);
    let folder: FolderSpec = FolderSpec::prefix("images");

    let content: Vec<u8> = b"identical bytes".to_vec();
    let first = uploader
        .upload(&folder, &Blob::from_bytes("a.png", content.clone()))
        .await
        .expect("first upload");
    // Same content under a different file name with the same extension.
    let second = uploader
        .upload(&folder, &Blob::from_bytes("b.png", content))
        .await
        .expect("second upload");

    assert_eq!(first.key, second.key);
    assert!(!first.deduplicated);
    assert!(second.deduplicated);
    assert_eq!(store.put_calls(), 1);
    assert_eq!(store.object_count(), 1);
}

#[tokio::test]
async fn same_content_different_folders_uploads_twice() {
    let store = MemoryObjectStore::new("assets");
    let ledger = RequestLedger::new();
    let uploader = Uploader::new(&store, &ledger);

    let content: Vec<u8> = b"shared bytes".to_vec();
    uploader
        .upload(&FolderSpec::prefix("images"), &Blob::from_bytes("a.png", content.clone()))
        .await
        .expect("first folder");
    uploader
        .upload(&FolderSpec::prefix("docs"), &Blob::from_bytes("a.png", content))
        .await
        .expect("second folder");

    assert_eq!(store.put_calls(), 2);
}

#[tokio::test]
async fn extensionless_blob_key_is_bare_digest() {
    let store = MemoryObjectStore::new("assets");
    let ledger = RequestLedger::new();
    let uploader = Uploader::new(&store, &ledger);

    let content: Vec<u8> = b"no extension here".to_vec();
    let outcome = uploader
        .upload(&FolderSpec::prefix("blobs"), &Blob::from_bytes("README", content.clone()))
        .await
        .expect("upload succeeds");

    assert_eq!(outcome.key, format!("blobs/{}", hash_bytes(&content)));
}

#[tokio::test]
async fn date_bucketed_key_contains_current_date() {
    let store = MemoryObjectStore::new("assets");
    let ledger = RequestLedger::new();
    let uploader = Uploader::new(&store, &ledger);

    let content: Vec<u8> = b"dated bytes".to_vec();
    let outcome = uploader
        .upload(
            &FolderSpec::date_bucketed("images"),
            &Blob::from_bytes("x.png", content.clone()),
        )
        .await
        .expect("upload succeeds");

    let today: String = Utc::now().format("%Y-%m-%d").to_string();
    assert_eq!(
        outcome.key,
        format!("images/{today}/{}.png", hash_bytes(&content))
    );
}

#[tokio::test]
async fn file_backed_blob_matches_in_memory_digest() {
    let data: Vec<u8> = (0u8..=255).cycle().take(3_000_000).collect();
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(&data).expect("write temp file");

    let store = MemoryObjectStore::new("assets");
    let ledger = RequestLedger::new();
    let uploader = Uploader::new(&store, &ledger);

    let blob: Blob = Blob::from_file(file.path());
    let outcome = uploader
        .upload(&FolderSpec::prefix("bulk"), &blob)
        .await
        .expect("upload succeeds");

    assert_eq!(outcome.bytes_hashed, data.len() as u64);
    assert!(outcome.key.contains(&hash_bytes(&data)));
    let stored = store.get(&outcome.key).expect("object stored");
    assert_eq!(stored.data.len(), data.len());
}

#[tokio::test]
async fn ledger_is_clean_after_success_and_failure() {
    let content: Vec<u8> = b"bytes".to_vec();

    let store = MemoryObjectStore::new("assets");
    let ledger = RequestLedger::new();
    let uploader = Uploader::new(&store, &ledger);
    uploader
        .upload(&FolderSpec::prefix("a"), &Blob::from_bytes("a.bin", content.clone()))
        .await
        .expect("upload succeeds");
    assert!(!ledger.is_busy());
    assert!(!ledger.is_masking());

    let failing = FailingStore { fail_write: false };
    let ledger = RequestLedger::new();
    let uploader = Uploader::new(&failing, &ledger);
    let err = uploader
        .upload(&FolderSpec::prefix("a"), &Blob::from_bytes("a.bin", content))
        .await
        .expect_err("query fails");
    assert!(matches!(err, StorageError::QueryFailure { .. }));
    assert!(!ledger.is_busy());
    assert!(!ledger.is_masking());
}

#[tokio::test]
async fn write_failure_propagates() {
    let failing = FailingStore { fail_write: true };
    let ledger = RequestLedger::new();
    let uploader = Uploader::new(&failing, &ledger);

    let err = uploader
        .upload(&FolderSpec::prefix("a"), &Blob::from_bytes("a.bin", vec![1, 2, 3]))
        .await
        .expect_err("write fails");
    assert!(matches!(err, StorageError::WriteFailure { .. }));
    assert!(!ledger.is_busy());
}

#[tokio::test]
async fn empty_selection_is_rejected() {
    let store = MemoryObjectStore::new("assets");
    let ledger = RequestLedger::new();
    let uploader = Uploader::new(&store, &ledger);

    let err = uploader
        .upload_selection(&FolderSpec::prefix("a"), None)
        .await
        .expect_err("no file selected");
    assert!(matches!(err, StorageError::NoFileSelected));
    assert_eq!(store.put_calls(), 0);
    assert!(!ledger.is_busy());
}

#[tokio::test]
async fn upload_signed_returns_key_and_url() {
    let store = MemoryObjectStore::new("assets");
    let ledger = RequestLedger::new();
    let uploader = Uploader::new(&store, &ledger);

    let stored = uploader
        .upload_signed(
            &FolderSpec::prefix("images"),
            &Blob::from_bytes("cat.png", b"cat".to_vec()),
            &SignOptions::new().with_expires_secs(600),
        )
        .await
        .expect("upload and sign");

    assert!(stored.key.starts_with("images/"));
    assert!(stored.url.contains(&stored.key));
    assert!(stored.url.contains("Expires=600"));
}

#[tokio::test]
async fn sign_passes_through_qualified_and_empty_keys() {
    let store = MemoryObjectStore::new("assets");
    let ledger = RequestLedger::new();
    let uploader = Uploader::new(&store, &ledger);
    let options: SignOptions = SignOptions::default();

    let absolute: &str = "https://cdn.example.com/a.png";
    assert_eq!(
        uploader.sign(absolute, &options).await.expect("passthrough"),
        absolute
    );
    assert_eq!(uploader.sign("", &options).await.expect("passthrough"), "");

    let signed: String = uploader
        .sign("images/a.png", &options)
        .await
        .expect("signing succeeds");
    assert!(signed.contains("Signature="));
}
