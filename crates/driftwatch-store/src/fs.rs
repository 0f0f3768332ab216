//! Filesystem-backed object store
//!
//! Buckets are directories under a root, keys are relative paths below the
//! bucket directory. Suitable for local runs and CI; layout mirrors what the
//! other stores expose so artifacts stay portable.

use crate::store::{ObjectInfo, ObjectStore, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Object store rooted at a local directory.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map bucket/key to a path under the root, rejecting traversal.
    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StoreError> {
        if bucket.is_empty() || key.is_empty() {
            return Err(StoreError::Io(
                format!("{}/{}", bucket, key),
                "empty bucket or key".to_string(),
            ));
        }
        let mut path = self.root.join(bucket);
        for part in key.split('/') {
            if part.is_empty() || part == "." || part == ".." {
                return Err(StoreError::Io(
                    format!("{}/{}", bucket, key),
                    "invalid key component".to_string(),
                ));
            }
            path.push(part);
        }
        Ok(path)
    }
}

#[async_trait]
impl ObjectStore for FsStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.object_path(bucket, key)?;
        tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                }
            } else {
                StoreError::Io(path.display().to_string(), e.to_string())
            }
        })
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), StoreError> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Io(parent.display().to_string(), e.to_string()))?;
        }
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| StoreError::Io(path.display().to_string(), e.to_string()))?;
        debug!(bucket = bucket, key = key, "object written");
        Ok(())
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectInfo>, StoreError> {
        let bucket_dir = self.root.join(bucket);
        if !bucket_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut objects = Vec::new();
        for entry in WalkDir::new(&bucket_dir).follow_links(false) {
            let entry =
                entry.map_err(|e| StoreError::Io(bucket_dir.display().to_string(), e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&bucket_dir)
                .map_err(|e| StoreError::Io(entry.path().display().to_string(), e.to_string()))?;
            let key = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if !key.starts_with(prefix) {
                continue;
            }

            let modified = entry
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(Utc::now);
            objects.push(ObjectInfo {
                key,
                last_modified: modified,
            });
        }

        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }
}
