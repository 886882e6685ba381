//! Storage module for document objects
//!
//! Supports S3-compatible APIs (MinIO, Cloudflare R2, AWS S3) and buckets
//! mounted into the local filesystem.

mod mount;
mod s3_client;
mod types;

pub use mount::MountedStore;
pub use s3_client::S3Client;
pub use types::*;
