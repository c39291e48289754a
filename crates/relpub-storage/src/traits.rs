//! Object store capability
//!
//! This module defines the ObjectStoreClient trait that every storage backend
//! implements. The publisher only ever needs to put whole objects by key.

use crate::StorageBackend;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Upload timed out after {0:?}")]
    Timeout(Duration),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Object store capability
///
/// Handles are authenticated at construction and safe to reuse for any number
/// of sequential calls. Putting an existing key overwrites the object.
#[async_trait]
pub trait ObjectStoreClient: Send + Sync {
    /// Store `data` under `storage_key`, replacing any existing object.
    async fn put_object(&self, storage_key: &str, data: Vec<u8>) -> StorageResult<()>;

    /// Check if an object exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Public location of the object stored under `storage_key`
    fn object_url(&self, storage_key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
