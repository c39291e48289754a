//! Relpub Storage Library
//!
//! This crate provides the object store capability used by the publisher and
//! its implementations for S3 (and S3-compatible providers) and the local
//! filesystem.
//!
//! # Storage key format
//!
//! Keys are `{platform}/{version}/{file name}` and are built by
//! `relpub_core::keys`. Backends only check that a key is safe to use:
//! no `..` segments and no leading `/`.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use relpub_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::{S3Settings, S3Storage};
pub use traits::{ObjectStoreClient, StorageError, StorageResult};
