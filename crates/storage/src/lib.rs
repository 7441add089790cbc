//! Content-addressed object storage with dedup-on-upload.
//!
//! This crate provides a backend-agnostic upload pipeline: blobs are
//! stream-hashed in fixed windows, stored under a content-addressed key,
//! and never uploaded twice for identical content under the same folder.
//! Around the pipeline it offers:
//!
//! - **Key derivation** - stable `prefix/[dateBucket/]digest.ext` keys
//! - **Signed URLs** - time-limited access URLs with passthrough for
//!   already-qualified keys
//! - **Request ledger** - in-flight operation tracking for UI
//!   loading/masking state
//!
//! The real store (cloud SDK, transport, auth) sits behind the
//! [`ObjectStore`] trait; [`MemoryObjectStore`] is an in-process backend
//! for tests and examples.

pub mod error;
pub mod key;
pub mod ledger;
pub mod memory;
pub mod sign;
mod traits;
mod types;
pub mod upload;

pub use error::StorageError;
pub use key::{object_key, object_key_at, FolderSpec, DEFAULT_DATE_PATTERN};
pub use ledger::{RequestHandle, RequestLedger};
pub use memory::MemoryObjectStore;
pub use sign::{is_qualified_url, sign, ResponseHeaderOverrides, SignOptions};
pub use traits::{ObjectInfo, ObjectStore, PutOutcome};
pub use types::{Blob, DataSource, PutMetadata, StoreSettings, StoreSettingsPatch};
pub use upload::{
    digest_source, PendingUpload, StoredObject, UploadOptions, UploadOutcome, Uploader,
};
