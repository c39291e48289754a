//! Test helpers for publisher tests
//!
//! In-memory object store that records every put and can be told to reject
//! or stall specific keys.

use async_trait::async_trait;
use relpub_core::StorageBackend;
use relpub_storage::{ObjectStoreClient, StorageError, StorageResult};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock object store for testing without network access
#[derive(Clone, Default)]
pub struct MockObjectStore {
    puts: Arc<Mutex<Vec<String>>>,
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    rejected: Arc<Mutex<HashSet<String>>>,
    delay: Option<Duration>,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every put to `key` with `UploadFailed`.
    pub fn reject(&self, key: &str) {
        self.rejected.lock().unwrap().insert(key.to_string());
    }

    /// Sleep before completing every put.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Keys passed to `put_object`, in call order, including rejected ones.
    pub fn put_keys(&self) -> Vec<String> {
        self.puts.lock().unwrap().clone()
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStoreClient for MockObjectStore {
    async fn put_object(&self, storage_key: &str, data: Vec<u8>) -> StorageResult<()> {
        self.puts.lock().unwrap().push(storage_key.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.rejected.lock().unwrap().contains(storage_key) {
            return Err(StorageError::UploadFailed(format!(
                "access denied for {}",
                storage_key
            )));
        }

        self.objects
            .lock()
            .unwrap()
            .insert(storage_key.to_string(), data);
        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self.objects.lock().unwrap().contains_key(storage_key))
    }

    fn object_url(&self, storage_key: &str) -> String {
        format!("mock://bucket/{}", storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
