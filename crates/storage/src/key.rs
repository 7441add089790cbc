//! Object key derivation.
//!
//! Keys are structured `prefix/[dateBucket/]name`, where the name is
//! normally the content digest plus the original file extension. Derivation
//! is pure except for the random-name and date-bucket branches.

use chrono::{DateTime, Utc};

use blobdepot_common::name_utils::{file_suffix, random_object_name};

/// Default strftime pattern for date-bucket subfolders.
pub const DEFAULT_DATE_PATTERN: &str = "%Y-%m-%d";

/// Target folder for a derived key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderSpec {
    /// Plain prefix, used as-is after normalization.
    Prefix(String),
    /// Prefix with a date-formatted subfolder inserted at call time.
    DateBucketed {
        prefix: String,
        /// strftime pattern for the subfolder name.
        pattern: String,
    },
}

impl FolderSpec {
    /// Create a plain prefix folder.
    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self::Prefix(prefix.into())
    }

    /// Create a date-bucketed folder with the default `%Y-%m-%d` pattern.
    pub fn date_bucketed(prefix: impl Into<String>) -> Self {
        Self::DateBucketed {
            prefix: prefix.into(),
            pattern: DEFAULT_DATE_PATTERN.into(),
        }
    }

    /// Create a date-bucketed folder with an explicit strftime pattern.
    ///
    /// # Arguments
    /// * `prefix` - Folder prefix
    /// * `pattern` - strftime pattern for the date subfolder
    pub fn date_bucketed_with(prefix: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::DateBucketed {
            prefix: prefix.into(),
            pattern: pattern.into(),
        }
    }

    fn raw_prefix(&self) -> &str {
        match self {
            Self::Prefix(prefix) => prefix,
            Self::DateBucketed { prefix, .. } => prefix,
        }
    }
}

impl From<&str> for FolderSpec {
    fn from(prefix: &str) -> Self {
        Self::Prefix(prefix.to_string())
    }
}

impl From<String> for FolderSpec {
    fn from(prefix: String) -> Self {
        Self::Prefix(prefix)
    }
}

/// Derive a storage key from a folder and an optional object name.
///
/// Date-bucketed folders read the UTC clock at call time; see
/// [`object_key_at`] for the clock-injected form.
///
/// # Arguments
/// * `folder` - Target folder
/// * `name` - Object name; `None` generates a random unique name
/// * `use_suffix_only` - Replace the name with just its extension
///   (dot included) before combining with the folder
pub fn object_key(folder: &FolderSpec, name: Option<&str>, use_suffix_only: bool) -> String {
    object_key_at(folder, name, use_suffix_only, Utc::now())
}

/// Derive a storage key using an explicit timestamp for date bucketing.
///
/// # Arguments
/// * `folder` - Target folder
/// * `name` - Object name; `None` generates a random unique name
/// * `use_suffix_only` - Replace the name with just its extension
/// * `now` - Timestamp formatted into the date-bucket subfolder
pub fn object_key_at(
    folder: &FolderSpec,
    name: Option<&str>,
    use_suffix_only: bool,
    now: DateTime<Utc>,
) -> String {
    // Cut the name down to its extension; a name with no extension is
    // kept whole rather than discarded.
    let name: Option<String> = if use_suffix_only {
        name.map(|n| file_suffix(n, true, n))
    } else {
        name.map(str::to_string)
    };

    let mut name: String = name.unwrap_or_else(random_object_name);
    // A bare extension ("png" selected as ".png") gets a random stem.
    if name.len() > 1 && name.starts_with('.') {
        name = format!("{}{}", random_object_name(), name);
    }

    let raw: &str = folder.raw_prefix();
    let raw: &str = raw.strip_prefix('/').unwrap_or(raw);
    let mut prefix: String = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };

    if let FolderSpec::DateBucketed { pattern, .. } = folder {
        prefix.push_str(&format!("{}/", now.format(pattern)));
    }

    format!("{prefix}{name}")
}
