#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::{S3Settings, S3Storage};
use crate::{ObjectStoreClient, StorageBackend, StorageError, StorageResult};
use relpub_core::PublisherConfig;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &PublisherConfig) -> StorageResult<Arc<dyn ObjectStoreClient>> {
    match config.storage_backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let required = |value: &Option<String>, name: &str| {
                value
                    .clone()
                    .ok_or_else(|| StorageError::ConfigError(format!("{} not configured", name)))
            };

            let storage = S3Storage::new(S3Settings {
                bucket: required(&config.bucket, "BUCKET")?,
                region: config.region.clone(),
                access_key: required(&config.access_key, "AWS_ACCESS_KEY")?,
                secret_key: required(&config.secret_key, "AWS_SECRET_KEY")?,
                endpoint_url: config.endpoint.clone(),
            })?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;

            let storage =
                LocalStorage::new(base_path, config.local_storage_base_url.clone()).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

#[cfg(all(test, feature = "storage-local", feature = "storage-s3"))]
mod tests {
    use super::*;

    fn config(extra: Vec<(&str, String)>) -> PublisherConfig {
        let mut vars = vec![
            ("VERSION", "2.1.3".to_string()),
            ("NGROK", "/rel/linux_amd64/ngrok".to_string()),
            ("NGROKD", "/rel/linux_amd64/ngrokd".to_string()),
        ];
        vars.extend(extra);
        PublisherConfig::from_vars(vars).unwrap()
    }

    #[tokio::test]
    async fn creates_local_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(vec![
            ("STORAGE_BACKEND", "local".to_string()),
            ("LOCAL_STORAGE_PATH", dir.path().display().to_string()),
        ]);

        let storage = create_storage(&config).await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Local);
    }

    #[tokio::test]
    async fn creates_s3_backend() {
        let config = config(vec![
            ("BUCKET", "releases".to_string()),
            ("AWS_ACCESS_KEY", "AKIDEXAMPLE".to_string()),
            ("AWS_SECRET_KEY", "secret".to_string()),
        ]);

        let storage = create_storage(&config).await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::S3);
        assert_eq!(
            storage.object_url("linux_amd64/2.1.3/ngrok"),
            "https://releases.s3.us-east-1.amazonaws.com/linux_amd64/2.1.3/ngrok"
        );
    }

    #[tokio::test]
    async fn s3_without_bucket_is_config_error() {
        let config = config(vec![]);
        let result = create_storage(&config).await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }
}
