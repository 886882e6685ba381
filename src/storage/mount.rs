//! Bucket mounted into the local filesystem

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StorageError;

use super::types::{ObjectMetadata, ObjectStore, StorageObject};

/// Reads objects from a directory where the bucket is mounted
#[derive(Debug, Clone)]
pub struct MountedStore {
    root: PathBuf,
}

impl MountedStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ObjectStore for MountedStore {
    fn location(&self) -> String {
        format!("mount:{}", self.root.display())
    }

    async fn get_object(&self, key: &str) -> Result<StorageObject, StorageError> {
        let path = self.root.join(key);

        let data = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::ObjectNotFound(key.to_string()),
            ErrorKind::PermissionDenied => StorageError::AccessDenied(key.to_string()),
            // Network mounts surface hiccups as these
            ErrorKind::Interrupted | ErrorKind::TimedOut | ErrorKind::WouldBlock => {
                StorageError::Transient(format!("Failed to read {}: {}", path.display(), e))
            }
            _ => StorageError::Backend(format!("Failed to read {}: {}", path.display(), e)),
        })?;

        let last_modified = tokio::fs::metadata(&path)
            .await
            .ok()
            .and_then(|m| m.modified().ok())
            .map(DateTime::<Utc>::from);

        Ok(StorageObject {
            metadata: ObjectMetadata {
                key: key.to_string(),
                size: data.len() as i64,
                last_modified,
                content_type: None,
                etag: None,
            },
            data,
        })
    }
}
