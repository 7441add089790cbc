//! Signed-URL issuance.
//!
//! Keys that are already absolute URLs (or empty) pass through unchanged;
//! everything else is signed by the backend. Nothing is cached, so every
//! call re-derives a fresh signature.

use std::sync::OnceLock;

use regex::Regex;

use blobdepot_common::constants::DEFAULT_SIGN_EXPIRY_SECS;

use crate::error::StorageError;
use crate::traits::ObjectStore;

/// Options forwarded to the backend when signing a key.
#[derive(Debug, Clone)]
pub struct SignOptions {
    /// Signature lifetime in seconds.
    pub expires_secs: u64,
    /// HTTP method the signature authorizes (GET when unset).
    pub method: Option<String>,
    /// Content type bound into the signature.
    pub content_type: Option<String>,
    /// Backend-specific processing directive (e.g. image transforms).
    pub process: Option<String>,
    /// Response header overrides baked into the signed URL.
    pub response: Option<ResponseHeaderOverrides>,
}

impl Default for SignOptions {
    fn default() -> Self {
        Self {
            expires_secs: DEFAULT_SIGN_EXPIRY_SECS,
            method: None,
            content_type: None,
            process: None,
            response: None,
        }
    }
}

impl SignOptions {
    /// Create options with the default expiry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the signature lifetime.
    pub fn with_expires_secs(mut self, expires_secs: u64) -> Self {
        self.expires_secs = expires_secs;
        self
    }

    /// Set the HTTP method the signature authorizes.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Set the content type bound into the signature.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set response header overrides.
    pub fn with_response(mut self, response: ResponseHeaderOverrides) -> Self {
        self.response = Some(response);
        self
    }
}

/// Response headers the store should serve the object with.
#[derive(Debug, Clone, Default)]
pub struct ResponseHeaderOverrides {
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub cache_control: Option<String>,
}

/// Whether a key is already a fully qualified URL (`scheme://...`).
pub fn is_qualified_url(name: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern: &Regex =
        PATTERN.get_or_init(|| Regex::new("^[a-zA-Z]+://").expect("static pattern compiles"));
    pattern.is_match(name)
}

/// Produce a time-limited access URL for a stored key.
///
/// Empty keys and already-qualified URLs are returned unchanged rather
/// than re-signed.
///
/// # Arguments
/// * `client` - Backend that issues signatures
/// * `name` - Storage key, or an already-qualified URL
/// * `options` - Signing options
pub async fn sign<C>(client: &C, name: &str, options: &SignOptions) -> Result<String, StorageError>
where
    C: ObjectStore + ?Sized,
{
    if name.is_empty() || is_qualified_url(name) {
        return Ok(name.to_string());
    }
    client.signature_url(name, options).await
}
