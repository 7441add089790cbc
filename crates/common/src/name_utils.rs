//! File-name helpers for object key construction.

use uuid::Uuid;

/// Extract the extension segment of a file name.
///
/// A name with no dot, or ending in a bare dot, has no usable extension
/// and yields `default` instead.
///
/// # Arguments
/// * `name` - File name to inspect
/// * `with_dot` - Include the leading dot in the returned suffix
/// * `default` - Value returned when no extension can be cut
///
/// # Returns
/// The suffix (for example `".png"` or `"png"`), or `default`.
pub fn file_suffix(name: &str, with_dot: bool, default: &str) -> String {
    match name.rfind('.') {
        Some(index) if !name.ends_with('.') => {
            let start: usize = if with_dot { index } else { index + 1 };
            name[start..].to_string()
        }
        _ => default.to_string(),
    }
}

/// Generate a random unique object name (hyphenated UUID v4).
pub fn random_object_name() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_suffix_with_dot() {
        assert_eq!(file_suffix("a.b.png", true, ""), ".png");
    }

    #[test]
    fn test_file_suffix_without_dot() {
        assert_eq!(file_suffix("a.b.png", false, ""), "png");
    }

    #[test]
    fn test_file_suffix_no_extension_returns_default() {
        assert_eq!(file_suffix("noext", true, ""), "");
        assert_eq!(file_suffix("noext", true, "noext"), "noext");
    }

    #[test]
    fn test_file_suffix_trailing_dot_returns_default() {
        assert_eq!(file_suffix("archive.", true, ""), "");
    }

    #[test]
    fn test_file_suffix_dotfile() {
        assert_eq!(file_suffix(".png", true, ""), ".png");
        assert_eq!(file_suffix(".png", false, ""), "png");
    }

    #[test]
    fn test_random_object_name_unique() {
        let a: String = random_object_name();
        let b: String = random_object_name();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }
}
