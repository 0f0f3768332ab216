//! The object store trait and shared helpers

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Metadata for one stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    /// Key within the bucket, `/`-separated
    pub key: String,

    /// Last modification time
    pub last_modified: DateTime<Utc>,
}

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("IO error on {0}: {1}")]
    Io(String, String),

    #[error("Invalid JSON in {0}: {1}")]
    Json(String, String),

    #[error("Invalid data location: {0}")]
    InvalidLocation(String),
}

/// Bucket/key object storage.
///
/// Keys are `/`-separated paths. Buckets are flat namespaces; listing with
/// an empty prefix enumerates a whole bucket.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an object's bytes.
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Write an object, creating or replacing it.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError>;

    /// Enumerate objects whose keys start with `prefix`. Order is
    /// implementation-defined; callers sort as needed.
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectInfo>, StoreError>;

    /// Whether at least one object exists under `prefix`.
    async fn has_any(&self, bucket: &str, prefix: &str) -> Result<bool, StoreError> {
        Ok(!self.list(bucket, prefix).await?.is_empty())
    }
}

/// Fetch an object and parse it as JSON.
pub async fn get_json<T: DeserializeOwned>(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
) -> Result<T, StoreError> {
    let body = store.get(bucket, key).await?;
    serde_json::from_slice(&body)
        .map_err(|e| StoreError::Json(format!("{}/{}", bucket, key), e.to_string()))
}

/// Serialize a document as pretty-printed JSON and write it.
pub async fn put_json<T: Serialize>(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let body = serde_json::to_vec_pretty(value)
        .map_err(|e| StoreError::Json(format!("{}/{}", bucket, key), e.to_string()))?;
    store
        .put(bucket, key, body, "application/json; charset=utf-8")
        .await
}
