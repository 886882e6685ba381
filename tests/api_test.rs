//! HTTP-level tests for the extraction endpoints

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use ocr_extract_server::config::Config;
use ocr_extract_server::document::{DocumentResult, PageRasterizer, RasterOptions};
use ocr_extract_server::error::StorageError;
use ocr_extract_server::inference::{
    InferenceClient, InferenceError, InferenceOptions, InferenceOutput,
};
use ocr_extract_server::storage::{ObjectMetadata, ObjectStore, StorageObject};
use ocr_extract_server::{build_router, AppState};

/// 1x1 white PNG
const WHITE_PIXEL_PNG_B64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAIAAACQd1PeAAAADElEQVR4nGP4//8/AAX+Av4N70a4AAAAAElFTkSuQmCC";

#[derive(Default)]
struct MemoryStore {
    objects: HashMap<String, (Vec<u8>, String)>,
    calls: AtomicUsize,
}

impl MemoryStore {
    fn with_object(mut self, key: &str, data: &[u8], content_type: &str) -> Self {
        self.objects
            .insert(key.to_string(), (data.to_vec(), content_type.to_string()));
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn location(&self) -> String {
        "memory://documents".to_string()
    }

    async fn get_object(&self, key: &str) -> Result<StorageObject, StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (data, content_type) = self
            .objects
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::ObjectNotFound(key.to_string()))?;

        Ok(StorageObject {
            metadata: ObjectMetadata {
                key: key.to_string(),
                size: data.len() as i64,
                last_modified: None,
                content_type: Some(content_type),
                etag: None,
            },
            data,
        })
    }
}

/// Produces `page-N` buffers instead of rendering
struct LabelRasterizer {
    pages: usize,
}

impl PageRasterizer for LabelRasterizer {
    fn rasterize(&self, _data: &[u8], _options: &RasterOptions) -> DocumentResult<Vec<Vec<u8>>> {
        Ok((0..self.pages)
            .map(|i| format!("page-{}", i).into_bytes())
            .collect())
    }
}

/// Echoes UTF-8 page bytes back as text; non-text images read as blank
struct EchoClient {
    failing_page: Option<&'static str>,
}

#[async_trait]
impl InferenceClient for EchoClient {
    fn model_name(&self) -> &str {
        "echo"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn infer(
        &self,
        image_data: &[u8],
        _options: &InferenceOptions,
    ) -> Result<InferenceOutput, InferenceError> {
        let text = String::from_utf8(image_data.to_vec()).unwrap_or_default();
        if self.failing_page == Some(text.as_str()) {
            return Err(InferenceError::Failed("model rejected page".to_string()));
        }

        Ok(InferenceOutput {
            text,
            ..Default::default()
        })
    }
}

fn app(store: Arc<MemoryStore>, failing_page: Option<&'static str>) -> Router {
    let mut config = Config::default();
    config.pipeline.fetch_backoff_ms = 1;

    let state = AppState::new(
        config,
        store,
        Arc::new(LabelRasterizer { pages: 3 }),
        Arc::new(EchoClient { failing_page }),
    );
    build_router(state)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

#[tokio::test]
async fn test_health_check() {
    let app = app(Arc::new(MemoryStore::default()), None);
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "ocr-extract-server");
}

#[tokio::test]
async fn test_simple_extraction_of_blank_inline_image() {
    let app = app(Arc::new(MemoryStore::default()), None);
    let request = post_json(
        "/extract_text_simple",
        json!({ "image_data": format!("data:image/png;base64,{}", WHITE_PIXEL_PNG_B64) }),
    );

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["extracted_text"], "");
    assert_eq!(body["word_count"], 0);
    assert_eq!(body["character_count"], 0);
    assert_eq!(body["total_pages"], 1);
    assert_eq!(body["processing_info"]["mode"], "simple_extraction");
    assert_eq!(body["processing_info"]["media_type"], "image/png");
}

#[tokio::test]
async fn test_both_inputs_rejected_before_storage() {
    let store = Arc::new(MemoryStore::default().with_object("scan.pdf", b"%PDF-1.4", "application/pdf"));
    let app = app(store.clone(), None);
    let request = post_json(
        "/extract_text_and_analyze",
        json!({
            "image_data": format!("data:image/png;base64,{}", WHITE_PIXEL_PNG_B64),
            "file_name": "scan.pdf",
        }),
    );

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "INVALID_INPUT");
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_missing_input_rejected() {
    let app = app(Arc::new(MemoryStore::default()), None);
    let request = post_json("/extract_text_simple", json!({ "output_format": "json" }));

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_unknown_object_is_not_found() {
    let store = Arc::new(MemoryStore::default());
    let app = app(store.clone(), None);
    let request = post_json(
        "/extract_text_and_analyze",
        json!({ "file_name": "missing/report.pdf" }),
    );

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "RESOURCE_NOT_FOUND");
    // Not-found is final, no retries
    assert_eq!(store.calls(), 1);
}

#[tokio::test]
async fn test_stored_pdf_with_one_failing_page() {
    let store = Arc::new(MemoryStore::default().with_object(
        "reports/q3.pdf",
        b"%PDF-1.4 three pages",
        "application/pdf",
    ));
    let app = app(store, Some("page-1"));
    let request = post_json(
        "/extract_text_and_analyze",
        json!({ "file_name": "reports/q3.pdf", "include_layout_analysis": false }),
    );

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["total_pages"], 3);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["page_index"], 0);
    assert_eq!(results[0]["text_content"], "page-0");
    assert_eq!(results[0]["character_metrics"]["character_count"], 6);
    assert_eq!(results[1]["status"], "failed");
    assert_eq!(results[1]["error_code"], "INFERENCE_FAILED");
    assert_eq!(results[2]["text_content"], "page-2");
    assert_eq!(body["processing_info"]["source"], "memory://documents/reports/q3.pdf");
}

#[tokio::test]
async fn test_simple_extraction_joins_pages_and_lists_failures() {
    let store = Arc::new(MemoryStore::default().with_object(
        "reports/q3.pdf",
        b"%PDF-1.4 three pages",
        "application/pdf",
    ));
    let app = app(store, Some("page-1"));
    let request = post_json("/extract_text_simple", json!({ "file_name": "reports/q3.pdf" }));

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["extracted_text"], "page-0\n\npage-2");
    assert_eq!(body["word_count"], 2);
    assert_eq!(body["failed_pages"][0]["page_index"], 1);
    assert_eq!(body["failed_pages"][0]["error_code"], "INFERENCE_FAILED");
}

#[tokio::test]
async fn test_malformed_body_gets_structured_error() {
    let app = app(Arc::new(MemoryStore::default()), None);
    let request = Request::builder()
        .method("POST")
        .uri("/extract_text_and_analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "INVALID_INPUT");
    assert_eq!(body["error_type"], "InvalidInput");
}

#[tokio::test]
async fn test_traversal_object_name_rejected() {
    let store = Arc::new(MemoryStore::default());
    let app = app(store.clone(), None);
    let request = post_json(
        "/extract_text_simple",
        json!({ "file_name": "../secrets/key.pdf" }),
    );

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "INVALID_INPUT");
    assert_eq!(store.calls(), 0);
}
