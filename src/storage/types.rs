//! Storage types

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StorageError;

/// Metadata about a storage object
#[derive(Debug, Clone)]
pub struct ObjectMetadata {
    pub key: String,
    pub size: i64,
    pub last_modified: Option<DateTime<Utc>>,
    pub content_type: Option<String>,
    pub etag: Option<String>,
}

/// A storage object with its data
#[derive(Debug)]
pub struct StorageObject {
    pub metadata: ObjectMetadata,
    pub data: Vec<u8>,
}

/// Read access to the document bucket
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Human-readable location, e.g. `s3://documents`
    fn location(&self) -> String;

    /// Fetch an object's data. Missing objects must map to
    /// `StorageError::ObjectNotFound`, retryable failures to
    /// `StorageError::Transient`.
    async fn get_object(&self, key: &str) -> Result<StorageObject, StorageError>;
}
