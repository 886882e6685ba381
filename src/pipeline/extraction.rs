//! Extraction pipeline
//!
//! resolve → split → aggregate, under one request deadline. Resolution and
//! splitting overrunning the deadline fail the whole request; inference
//! overruns are recorded per page by the aggregator.

use std::time::Duration;

use tokio::time::Instant;

use crate::document::DocumentSplitter;
use crate::error::{AppError, Result};
use crate::inference::InferenceOptions;
use crate::ingest::{DocumentInput, ExtractOptions, InputResolver};

use super::aggregator::{AggregateOptions, ResultAggregator};
use super::types::AggregateResult;

/// Aggregate result plus what the response needs to describe the source
#[derive(Debug)]
pub struct ExtractionOutcome {
    pub aggregate: AggregateResult,
    pub source: String,
    pub document_sha256: String,
    pub media_type: String,
    pub elapsed: Duration,
}

#[derive(Clone)]
pub struct ExtractionPipeline {
    resolver: InputResolver,
    splitter: DocumentSplitter,
    aggregator: ResultAggregator,
    default_deadline: Duration,
}

impl ExtractionPipeline {
    pub fn new(
        resolver: InputResolver,
        splitter: DocumentSplitter,
        aggregator: ResultAggregator,
        default_deadline: Duration,
    ) -> Self {
        Self {
            resolver,
            splitter,
            aggregator,
            default_deadline,
        }
    }

    pub fn aggregator(&self) -> &ResultAggregator {
        &self.aggregator
    }

    pub async fn run(&self, input: DocumentInput, options: ExtractOptions) -> Result<ExtractionOutcome> {
        let started = Instant::now();
        let deadline = started + options.deadline.unwrap_or(self.default_deadline);

        let prepare = async {
            let document = self.resolver.resolve(&input).await?;
            let source = document.source_description().to_string();
            let sha256 = document.sha256().to_string();
            let media_type = document.media_type().to_string();
            let pages = self.splitter.split(document).await?;
            Ok::<_, AppError>((pages, source, sha256, media_type))
        };

        let (pages, source, document_sha256, media_type) =
            tokio::time::timeout_at(deadline, prepare)
                .await
                .map_err(|_| {
                    AppError::Timeout("deadline expired before inference started".to_string())
                })??;

        tracing::info!("Split {} into {} page(s)", source, pages.len());

        let aggregate = self
            .aggregator
            .aggregate(
                pages,
                AggregateOptions {
                    inference: InferenceOptions {
                        include_layout: options.include_layout_analysis,
                        output_format: options.output_format,
                    },
                    include_metrics: options.include_character_metrics,
                },
                deadline,
            )
            .await;

        Ok(ExtractionOutcome {
            aggregate,
            source,
            document_sha256,
            media_type,
            elapsed: started.elapsed(),
        })
    }
}
