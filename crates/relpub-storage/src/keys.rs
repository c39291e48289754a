//! Shared key checks for storage backends.

use crate::traits::{StorageError, StorageResult};

/// Reject keys that are empty, absolute, or contain `..` segments.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if storage_key.starts_with('/') || storage_key.split('/').any(|segment| segment == "..") {
        return Err(StorageError::InvalidKey(format!(
            "Storage key {} contains invalid characters",
            storage_key
        )));
    }
    Ok(())
}
