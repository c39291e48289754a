use crate::keys::validate_key;
use crate::traits::{ObjectStoreClient, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{ObjectStoreExt, PutPayload, Result as ObjectResult};

/// Credentials and location of an S3 (or S3-compatible) bucket.
#[derive(Clone, Debug)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    /// Custom endpoint for S3-compatible providers
    /// (e.g. "http://localhost:9000" for MinIO)
    pub endpoint_url: Option<String>,
}

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    region: String,
    endpoint_url: Option<String>,
}

impl S3Storage {
    /// Create a new S3Storage instance from explicit credentials.
    pub fn new(settings: S3Settings) -> StorageResult<Self> {
        let S3Settings {
            bucket,
            region,
            access_key,
            secret_key,
            endpoint_url,
        } = settings;

        let mut builder = AmazonS3Builder::new()
            .with_access_key_id(access_key)
            .with_secret_access_key(secret_key)
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store,
            bucket,
            region,
            endpoint_url,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

/// Public URL for an object.
///
/// AWS uses `https://{bucket}.s3.{region}.amazonaws.com/{key}`; custom
/// endpoints use path style, `{endpoint}/{bucket}/{key}`.
fn object_url(bucket: &str, region: &str, endpoint_url: Option<&str>, key: &str) -> String {
    match endpoint_url {
        Some(endpoint) => format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key),
        None => format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key),
    }
}

#[async_trait]
impl ObjectStoreClient for S3Storage {
    async fn put_object(&self, storage_key: &str, data: Vec<u8>) -> StorageResult<()> {
        validate_key(storage_key)?;

        let size = data.len() as u64;
        let bytes = Bytes::from(data);
        let location = Path::from(storage_key.to_string());
        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self.store.put(&location, PutPayload::from(bytes)).await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        validate_key(storage_key)?;
        let location = Path::from(storage_key.to_string());
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    fn object_url(&self, storage_key: &str) -> String {
        object_url(
            &self.bucket,
            &self.region,
            self.endpoint_url.as_deref(),
            storage_key,
        )
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(endpoint_url: Option<&str>) -> S3Settings {
        S3Settings {
            bucket: "releases".to_string(),
            region: "us-east-1".to_string(),
            access_key: "AKIDEXAMPLE".to_string(),
            secret_key: "secret".to_string(),
            endpoint_url: endpoint_url.map(String::from),
        }
    }

    #[test]
    fn aws_url_is_virtual_hosted() {
        assert_eq!(
            object_url("releases", "us-east-1", None, "linux_amd64/2.1.3/ngrok"),
            "https://releases.s3.us-east-1.amazonaws.com/linux_amd64/2.1.3/ngrok"
        );
    }

    #[test]
    fn custom_endpoint_url_is_path_style() {
        assert_eq!(
            object_url(
                "releases",
                "us-east-1",
                Some("http://localhost:9000/"),
                "linux_amd64/2.1.3/ngrokd"
            ),
            "http://localhost:9000/releases/linux_amd64/2.1.3/ngrokd"
        );
    }

    #[test]
    fn builds_without_network_access() {
        let storage = S3Storage::new(settings(Some("http://localhost:9000"))).unwrap();
        assert_eq!(storage.bucket(), "releases");
        assert_eq!(storage.backend_type(), StorageBackend::S3);
        assert_eq!(
            storage.object_url("darwin_amd64/1.0/ngrok"),
            "http://localhost:9000/releases/darwin_amd64/1.0/ngrok"
        );
    }

    #[tokio::test]
    async fn invalid_key_rejected_before_request() {
        let storage = S3Storage::new(settings(None)).unwrap();
        let result = storage.put_object("../escape", b"x".to_vec()).await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}
