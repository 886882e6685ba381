//! Stored object resolution
//!
//! Fetches a named object through an `ObjectStore`, retrying transient
//! failures with exponential backoff.

use std::path::{Component, Path};
use std::sync::Arc;
use std::time::Duration;

use crate::document::{is_generic_media_type, sniff_media_type, ResolvedDocument};
use crate::error::{AppError, Result, StorageError};
use crate::storage::ObjectStore;

/// Retry schedule for transient storage failures
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles afterwards
    pub initial_backoff: Duration,
    /// Upper bound on any single delay
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    fn backoff(&self, attempt: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
            .min(self.max_backoff)
    }
}

#[derive(Clone)]
pub struct ObjectResolver {
    store: Arc<dyn ObjectStore>,
    retry: RetryPolicy,
}

impl ObjectResolver {
    pub fn new(store: Arc<dyn ObjectStore>, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    pub async fn resolve(&self, object_name: &str) -> Result<ResolvedDocument> {
        let key = validate_object_name(object_name)?;

        let object = self.fetch_with_retry(key).await?;
        if object.data.is_empty() {
            return Err(AppError::InvalidInput(format!("object {} is empty", key)));
        }

        let media_type = resolve_media_type(key, object.metadata.content_type.as_deref(), &object.data);
        tracing::debug!(
            "Fetched {} ({} bytes, {}) from {}",
            key,
            object.data.len(),
            media_type,
            self.store.location()
        );

        Ok(ResolvedDocument::new(
            object.data,
            media_type,
            format!("{}/{}", self.store.location(), key),
        ))
    }

    async fn fetch_with_retry(&self, key: &str) -> Result<crate::storage::StorageObject> {
        let mut attempt = 1;
        loop {
            match self.store.get_object(key).await {
                Ok(object) => return Ok(object),
                Err(e) if e.is_transient() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.backoff(attempt);
                    tracing::warn!(
                        "Fetching {} failed (attempt {}/{}): {}. Retrying in {:?}",
                        key,
                        attempt,
                        self.retry.max_attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(StorageError::Transient(msg)) => {
                    return Err(AppError::UpstreamUnavailable(format!(
                        "giving up on {} after {} attempts: {}",
                        key, attempt, msg
                    )))
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Reject names that could escape the bucket root
fn validate_object_name(name: &str) -> Result<&str> {
    let key = name.trim();
    let path = Path::new(key);

    let escapes = path.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });

    if key.is_empty() || escapes || key.contains('\0') {
        return Err(AppError::InvalidInput(format!(
            "invalid object name: {:?}",
            name
        )));
    }

    Ok(key)
}

/// Store-reported type if specific, else magic bytes, else the extension
fn resolve_media_type(key: &str, reported: Option<&str>, data: &[u8]) -> String {
    if let Some(reported) = reported.filter(|t| !is_generic_media_type(t)) {
        return reported.to_string();
    }
    if let Some(sniffed) = sniff_media_type(data) {
        return sniffed.to_string();
    }
    mime_guess::from_path(key)
        .first_raw()
        .unwrap_or("application/octet-stream")
        .to_string()
}
