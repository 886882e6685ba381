//! Configuration management for the OCR extraction server

use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub inference: InferenceConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on the JSON request body
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: Option<String>,
    /// Root directory for the `mount` backend
    pub mount_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// S3-compatible API (MinIO, R2, AWS)
    S3,
    /// Bucket mounted into the local filesystem
    Mount,
}

#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Maximum in-flight inference calls per replica
    pub max_concurrency: usize,
    pub gpu_accelerated: bool,
    pub doc_orientation_classify: bool,
    pub doc_unwarping: bool,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub request_deadline_secs: u64,
    pub grace_period_secs: u64,
    pub fetch_max_attempts: u32,
    pub fetch_backoff_ms: u64,
    /// Cap on a single retry delay
    pub fetch_max_backoff_ms: u64,
    pub pdf_render_scale: f32,
    pub max_pages: usize,
    pub max_payload_bytes: usize,
}

impl ServerConfig {
    /// `host:port` as accepted by `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl PipelineConfig {
    pub fn request_deadline(&self) -> Duration {
        Duration::from_secs(self.request_deadline_secs)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_period_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                max_body_bytes: 64 * 1024 * 1024,
            },
            storage: StorageConfig {
                backend: StorageBackend::S3,
                endpoint: "http://localhost:9000".to_string(),
                bucket: "documents".to_string(),
                access_key: "admin".to_string(),
                secret_key: "password123".to_string(),
                region: Some("us-east-1".to_string()),
                mount_path: PathBuf::from("/mnt/documents"),
            },
            inference: InferenceConfig {
                endpoint: "http://localhost:8080".to_string(),
                model: "PaddleOCR-VL".to_string(),
                timeout_secs: 120,
                max_concurrency: 1,
                gpu_accelerated: true,
                doc_orientation_classify: true,
                doc_unwarping: true,
            },
            pipeline: PipelineConfig {
                request_deadline_secs: 300,
                grace_period_secs: 10,
                fetch_max_attempts: 3,
                fetch_backoff_ms: 200,
                fetch_max_backoff_ms: 5_000,
                pdf_render_scale: 2.0,
                max_pages: 200,
                max_payload_bytes: 48 * 1024 * 1024,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        let defaults = Config::default();

        let backend = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "s3".to_string())
            .as_str()
        {
            "mount" => StorageBackend::Mount,
            _ => StorageBackend::S3,
        };

        // Credentials are only mandatory when talking to the S3 API directly
        let (endpoint, bucket, access_key, secret_key) = match backend {
            StorageBackend::S3 => (
                env::var("S3_ENDPOINT")?,
                env::var("S3_BUCKET")?,
                env::var("S3_ACCESS_KEY")?,
                env::var("S3_SECRET_KEY")?,
            ),
            StorageBackend::Mount => (
                env::var("S3_ENDPOINT").unwrap_or(defaults.storage.endpoint),
                env::var("S3_BUCKET").unwrap_or(defaults.storage.bucket),
                String::new(),
                String::new(),
            ),
        };

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVER_PORT", defaults.server.port),
                max_body_bytes: parse_var("MAX_BODY_BYTES", defaults.server.max_body_bytes),
            },
            storage: StorageConfig {
                backend,
                endpoint,
                bucket,
                access_key,
                secret_key,
                region: env::var("S3_REGION").ok(),
                mount_path: env::var("STORAGE_MOUNT_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.mount_path),
            },
            inference: InferenceConfig {
                endpoint: env::var("INFERENCE_URL").unwrap_or(defaults.inference.endpoint),
                model: env::var("INFERENCE_MODEL").unwrap_or(defaults.inference.model),
                timeout_secs: parse_var("INFERENCE_TIMEOUT_SECS", defaults.inference.timeout_secs),
                max_concurrency: parse_var(
                    "INFERENCE_MAX_CONCURRENCY",
                    defaults.inference.max_concurrency,
                )
                .max(1),
                gpu_accelerated: parse_var(
                    "INFERENCE_GPU_ACCELERATED",
                    defaults.inference.gpu_accelerated,
                ),
                doc_orientation_classify: parse_var(
                    "DOC_ORIENTATION_CLASSIFY",
                    defaults.inference.doc_orientation_classify,
                ),
                doc_unwarping: parse_var("DOC_UNWARPING", defaults.inference.doc_unwarping),
            },
            pipeline: PipelineConfig {
                request_deadline_secs: parse_var(
                    "REQUEST_DEADLINE_SECS",
                    defaults.pipeline.request_deadline_secs,
                ),
                grace_period_secs: parse_var(
                    "DEADLINE_GRACE_SECS",
                    defaults.pipeline.grace_period_secs,
                ),
                fetch_max_attempts: parse_var(
                    "FETCH_MAX_ATTEMPTS",
                    defaults.pipeline.fetch_max_attempts,
                )
                .max(1),
                fetch_backoff_ms: parse_var("FETCH_BACKOFF_MS", defaults.pipeline.fetch_backoff_ms),
                fetch_max_backoff_ms: parse_var(
                    "FETCH_MAX_BACKOFF_MS",
                    defaults.pipeline.fetch_max_backoff_ms,
                ),
                pdf_render_scale: parse_var(
                    "PDF_RENDER_SCALE",
                    defaults.pipeline.pdf_render_scale,
                ),
                max_pages: parse_var("MAX_PAGES", defaults.pipeline.max_pages),
                max_payload_bytes: parse_var(
                    "MAX_PAYLOAD_BYTES",
                    defaults.pipeline.max_payload_bytes,
                ),
            },
        })
    }
}

/// Read an optional variable, keeping the default when absent or unparseable
fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring unparseable value for {}: {:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}
