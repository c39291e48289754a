use chrono::{DateTime, Utc};
use relpub_core::{ArtifactDescriptor, StorageBackend, StorageKey};
use serde::Serialize;

/// One uploaded artifact.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedArtifact {
    pub descriptor: ArtifactDescriptor,
    pub key: StorageKey,
    pub url: String,
    pub size_bytes: u64,
    /// Lowercase hex SHA-256 of the uploaded bytes
    pub sha256: String,
}

/// Outcome of a successful run, artifacts in input order.
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    pub backend: StorageBackend,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub artifacts: Vec<PublishedArtifact>,
}

impl PublishReport {
    pub fn keys(&self) -> impl Iterator<Item = &StorageKey> {
        self.artifacts.iter().map(|a| &a.key)
    }

    pub fn total_bytes(&self) -> u64 {
        self.artifacts.iter().map(|a| a.size_bytes).sum()
    }
}
