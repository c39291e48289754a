//! Relpub Core Library
//!
//! Configuration, artifact descriptors and storage key derivation shared by
//! the storage backends, the publisher and the CLI.
//!
//! # Storage key format
//!
//! Every published artifact lands at `{platform}/{version}/{file name}`, where
//! `platform` is the name of the directory holding the artifact on disk.

pub mod artifact;
pub mod config;
pub mod keys;
pub mod storage_types;

// Re-export commonly used types
pub use artifact::{ArtifactDescriptor, DescriptorError, ResolvedArtifact, SuffixRule};
pub use config::{ConfigError, PublisherConfig};
pub use keys::{storage_key, StorageKey};
pub use storage_types::StorageBackend;
