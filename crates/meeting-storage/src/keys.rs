//! Storage key generation and validation shared by all backends.
//!
//! Key format: `{uuid-v4}.{extension}`. Keys are random so that user-supplied
//! filenames never influence where an object lands.

use crate::traits::{StorageError, StorageResult};
use uuid::Uuid;

/// Generate a fresh storage key for a file with the given extension.
///
/// The extension is lowercased and may be passed with or without a leading dot.
pub fn generate_storage_key(extension: &str) -> String {
    let extension = extension.trim_start_matches('.').to_lowercase();
    if extension.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        format!("{}.{}", Uuid::new_v4(), extension)
    }
}

/// Reject keys that could escape a storage root.
///
/// Empty keys and keys containing `..`, `/` or `\` are invalid.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.trim().is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if key.contains("..") || key.contains('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_keys_are_unique_for_same_extension() {
        let a = generate_storage_key(".mp3");
        let b = generate_storage_key(".mp3");
        assert_ne!(a, b);
        assert!(a.ends_with(".mp3"));
        assert!(b.ends_with(".mp3"));
    }

    #[test]
    fn test_generated_key_format() {
        let key = generate_storage_key("WAV");
        let (stem, ext) = key.rsplit_once('.').unwrap();
        assert_eq!(ext, "wav");
        assert!(Uuid::parse_str(stem).is_ok());
        assert!(validate_key(&key).is_ok());
    }

    #[test]
    fn test_traversal_and_separators_rejected() {
        for key in ["../etc/passwd", "a/b.mp3", "a\\b.mp3", "..", "x..y.mp3", "", "  "] {
            assert!(
                matches!(validate_key(key), Err(StorageError::InvalidKey(_))),
                "key {:?} should be rejected",
                key
            );
        }
    }
}
