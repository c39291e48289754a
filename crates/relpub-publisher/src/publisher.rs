//! Artifact publisher.

use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::Utc;
use relpub_core::{ArtifactDescriptor, ResolvedArtifact};
use relpub_storage::{ObjectStoreClient, StorageError};
use sha2::{Digest, Sha256};

use crate::error::PublishError;
use crate::report::{PublishReport, PublishedArtifact};

#[derive(Debug, Clone, Copy, Default)]
pub struct PublishOptions {
    /// Per-upload limit; exceeding it is reported as `StoreRejected`.
    pub upload_timeout: Option<Duration>,
}

/// Publishes artifacts to one store, one upload at a time.
pub struct Publisher<'a> {
    store: &'a dyn ObjectStoreClient,
    options: PublishOptions,
}

impl<'a> Publisher<'a> {
    pub fn new(store: &'a dyn ObjectStoreClient, options: PublishOptions) -> Self {
        Self { store, options }
    }

    /// Upload every descriptor in order, stopping at the first error.
    pub async fn publish(
        &self,
        descriptors: &[ArtifactDescriptor],
    ) -> Result<PublishReport, PublishError> {
        if descriptors.is_empty() {
            return Err(PublishError::no_artifacts());
        }

        let started_at = Utc::now();
        let mut artifacts = Vec::with_capacity(descriptors.len());

        for (index, descriptor) in descriptors.iter().enumerate() {
            let published = self.publish_one(index, descriptor).await?;
            artifacts.push(published);
        }

        let report = PublishReport {
            backend: self.store.backend_type(),
            started_at,
            finished_at: Utc::now(),
            artifacts,
        };

        tracing::info!(
            backend = %report.backend,
            artifacts = report.artifacts.len(),
            total_bytes = report.total_bytes(),
            "Publish complete"
        );

        Ok(report)
    }

    async fn publish_one(
        &self,
        index: usize,
        descriptor: &ArtifactDescriptor,
    ) -> Result<PublishedArtifact, PublishError> {
        let resolved = resolve(descriptor)?;
        let data = read_artifact(&resolved.effective_path).await?;

        let size = data.len() as u64;
        let sha256 = hex::encode(Sha256::digest(&data));
        let start = Instant::now();

        tracing::debug!(
            index,
            path = %resolved.effective_path.display(),
            key = %resolved.key,
            size_bytes = size,
            "Uploading artifact"
        );

        let upload = self.store.put_object(resolved.key.as_str(), data);
        let result = match self.options.upload_timeout {
            Some(limit) => tokio::time::timeout(limit, upload)
                .await
                .unwrap_or(Err(StorageError::Timeout(limit))),
            None => upload.await,
        };

        if let Err(source) = result {
            tracing::error!(
                error = %source,
                index,
                path = %resolved.effective_path.display(),
                key = %resolved.key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Artifact upload rejected"
            );
            return Err(PublishError::StoreRejected {
                path: resolved.effective_path,
                key: resolved.key,
                source,
            });
        }

        tracing::info!(
            index,
            path = %resolved.effective_path.display(),
            key = %resolved.key,
            size_bytes = size,
            sha256 = %sha256,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Artifact published"
        );

        Ok(PublishedArtifact {
            descriptor: descriptor.clone(),
            url: self.store.object_url(resolved.key.as_str()),
            key: resolved.key,
            size_bytes: size,
            sha256,
        })
    }
}

/// Publish with default options.
pub async fn publish(
    descriptors: &[ArtifactDescriptor],
    store: &dyn ObjectStoreClient,
) -> Result<PublishReport, PublishError> {
    Publisher::new(store, PublishOptions::default())
        .publish(descriptors)
        .await
}

/// Dry run: resolve every descriptor and check its file, without uploading.
pub async fn plan(
    descriptors: &[ArtifactDescriptor],
) -> Result<Vec<ResolvedArtifact>, PublishError> {
    if descriptors.is_empty() {
        return Err(PublishError::no_artifacts());
    }

    let mut resolved = Vec::with_capacity(descriptors.len());
    for descriptor in descriptors {
        let artifact = resolve(descriptor)?;
        check_regular_file(&artifact.effective_path).await?;
        resolved.push(artifact);
    }
    Ok(resolved)
}

fn resolve(descriptor: &ArtifactDescriptor) -> Result<ResolvedArtifact, PublishError> {
    descriptor
        .resolve()
        .map_err(|source| PublishError::InvalidDescriptor {
            artifact: descriptor.effective_path().display().to_string(),
            source,
        })
}

async fn check_regular_file(path: &Path) -> Result<(), PublishError> {
    let not_found = |source: io::Error| PublishError::FileNotFound {
        path: path.to_path_buf(),
        source,
    };

    let metadata = tokio::fs::metadata(path).await.map_err(not_found)?;
    if !metadata.is_file() {
        return Err(not_found(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    Ok(())
}

async fn read_artifact(path: &Path) -> Result<Vec<u8>, PublishError> {
    check_regular_file(path).await?;
    tokio::fs::read(path)
        .await
        .map_err(|source| PublishError::FileNotFound {
            path: path.to_path_buf(),
            source,
        })
}
