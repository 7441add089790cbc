//! Error types for storage operations.

use thiserror::Error;

/// Errors that can occur during storage operations.
///
/// Every failure is terminal for its in-flight operation: nothing is
/// retried internally and exactly one error reaches the caller.
#[derive(Error, Debug, Clone)]
pub enum StorageError {
    /// No file was provided for upload.
    #[error("no file selected for upload")]
    NoFileSelected,

    /// A blob chunk could not be read while hashing or uploading.
    #[error("failed to read {name}: {message}")]
    ReadFailure { name: String, message: String },

    /// The existence query against the backing store failed.
    #[error("store query failed for prefix {prefix}: {message}")]
    QueryFailure { prefix: String, message: String },

    /// The store rejected or failed the object write.
    #[error("store write failed for {key}: {message}")]
    WriteFailure { key: String, message: String },
}

impl StorageError {
    /// Create a [`StorageError::ReadFailure`] from an IO error.
    ///
    /// # Arguments
    /// * `name` - Blob or file name being read
    /// * `err` - The underlying IO error
    pub fn read_failure(name: impl Into<String>, err: std::io::Error) -> Self {
        Self::ReadFailure {
            name: name.into(),
            message: err.to_string(),
        }
    }
}
