//! Application state management

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::document::{DocumentSplitter, PageRasterizer, RasterOptions};
use crate::inference::InferenceClient;
use crate::ingest::{InputResolver, ObjectResolver, PayloadDecoder, RetryPolicy};
use crate::pipeline::{ExtractionPipeline, ResultAggregator};
use crate::response::ResponseAssembler;
use crate::storage::ObjectStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    pipeline: ExtractionPipeline,
    assembler: ResponseAssembler,
}

impl AppState {
    /// Wire the pipeline from configuration and its external collaborators
    pub fn new(
        config: Config,
        store: Arc<dyn ObjectStore>,
        rasterizer: Arc<dyn PageRasterizer>,
        inference: Arc<dyn InferenceClient>,
    ) -> Self {
        let pipeline_config = &config.pipeline;

        let resolver = InputResolver::new(
            PayloadDecoder::new(pipeline_config.max_payload_bytes),
            ObjectResolver::new(
                store,
                RetryPolicy {
                    max_attempts: pipeline_config.fetch_max_attempts.max(1),
                    initial_backoff: Duration::from_millis(pipeline_config.fetch_backoff_ms),
                    max_backoff: Duration::from_millis(pipeline_config.fetch_max_backoff_ms),
                },
            ),
        );

        let splitter = DocumentSplitter::new(
            rasterizer,
            RasterOptions {
                scale: pipeline_config.pdf_render_scale,
                max_pages: pipeline_config.max_pages,
            },
        );

        let aggregator = ResultAggregator::new(
            inference,
            config.inference.max_concurrency,
            pipeline_config.grace_period(),
        );

        let pipeline = ExtractionPipeline::new(
            resolver,
            splitter,
            aggregator,
            pipeline_config.request_deadline(),
        );
        let assembler = ResponseAssembler::new(&config.inference);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline,
                assembler,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn pipeline(&self) -> &ExtractionPipeline {
        &self.inner.pipeline
    }

    pub fn assembler(&self) -> &ResponseAssembler {
        &self.inner.assembler
    }
}
