use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use shared_database::supabase::SupabaseClient;

use crate::models::ProfileError;

/// Object storage for uploaded images. Returns a url the client can load.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, ProfileError>;
}

pub struct SupabaseBlobStore {
    supabase: Arc<SupabaseClient>,
    bucket: String,
}

impl SupabaseBlobStore {
    pub fn new(supabase: Arc<SupabaseClient>, bucket: impl Into<String>) -> Self {
        Self {
            supabase,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl BlobStore for SupabaseBlobStore {
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, ProfileError> {
        let url = self.supabase
            .upload_object(&self.bucket, key, bytes, content_type, None)
            .await?;
        Ok(url)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredBlob {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub struct InMemoryBlobStore {
    base_url: String,
    objects: RwLock<HashMap<String, StoredBlob>>,
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new("memory://blobs")
    }
}

impl InMemoryBlobStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &str) -> Option<StoredBlob> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, ProfileError> {
        debug!("Storing {} bytes at {}", bytes.len(), key);
        self.objects.write().await.insert(
            key.to_string(),
            StoredBlob {
                content_type: content_type.to_string(),
                bytes,
            },
        );
        Ok(format!("{}/{}", self.base_url, key))
    }
}
