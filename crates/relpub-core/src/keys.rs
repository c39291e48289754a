//! Storage key derivation.
//!
//! Key format: `{platform}/{version}/{file name}`. All backends receive keys
//! built here so re-publishing the same artifact overwrites the same object.

use serde::Serialize;
use std::fmt;

/// Object key under which an artifact is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the storage key for an artifact.
///
/// Pure function of its inputs: no trimming, escaping or normalisation.
pub fn storage_key(platform_tag: &str, version: &str, base_name: &str) -> StorageKey {
    StorageKey(format!("{}/{}/{}", platform_tag, version, base_name))
}
