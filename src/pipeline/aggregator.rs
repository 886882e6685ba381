//! Result aggregation
//!
//! Drives page units through the inference backend under a semaphore shared
//! by every request on this replica, then merges results back into page
//! order.
//!
//! Deadline handling: a page still waiting for a permit when the deadline
//! passes is never dispatched. Pages already in flight get until
//! `deadline + grace_period`; whatever has not come back by then is recorded
//! as a timeout.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use tokio::time::Instant;

use crate::error::ErrorCode;
use crate::inference::{InferenceClient, InferenceError, InferenceOptions};
use crate::metrics::compute_metrics;
use crate::document::PageUnit;

use super::types::{AggregateResult, PageResult};

/// What to compute for each page
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregateOptions {
    pub inference: InferenceOptions,
    pub include_metrics: bool,
}

#[derive(Clone)]
pub struct ResultAggregator {
    client: Arc<dyn InferenceClient>,
    permits: Arc<Semaphore>,
    grace_period: Duration,
}

impl ResultAggregator {
    pub fn new(client: Arc<dyn InferenceClient>, max_concurrency: usize, grace_period: Duration) -> Self {
        Self {
            client,
            permits: Arc::new(Semaphore::new(max_concurrency.max(1))),
            grace_period,
        }
    }

    pub fn client(&self) -> &Arc<dyn InferenceClient> {
        &self.client
    }

    pub async fn aggregate(
        &self,
        pages: Vec<PageUnit>,
        options: AggregateOptions,
        deadline: Instant,
    ) -> AggregateResult {
        let total = pages.len();
        let hard_stop = deadline + self.grace_period;

        let mut in_flight: FuturesUnordered<_> = pages
            .into_iter()
            .map(|page| self.process_page(page, options, deadline))
            .collect();

        let mut slots: Vec<Option<PageResult>> = vec![None; total];
        loop {
            match tokio::time::timeout_at(hard_stop, in_flight.next()).await {
                Ok(Some(result)) => {
                    if let Some(slot) = slots.get_mut(result.index) {
                        *slot = Some(result);
                    }
                }
                Ok(None) => break,
                Err(_) => {
                    tracing::warn!(
                        "Grace period expired with {} page(s) still in flight",
                        in_flight.len()
                    );
                    break;
                }
            }
        }
        drop(in_flight);

        let page_results: Vec<PageResult> = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| slot.unwrap_or_else(|| PageResult::timed_out(index)))
            .collect();

        let result = AggregateResult::new(page_results);
        tracing::info!(
            "Aggregated {} page(s), {} failed",
            total,
            result.failed_count()
        );
        result
    }

    async fn process_page(
        &self,
        page: PageUnit,
        options: AggregateOptions,
        deadline: Instant,
    ) -> PageResult {
        let index = page.index;

        let _permit = match tokio::time::timeout_at(deadline, self.permits.acquire()).await {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => {
                return PageResult::failed(index, ErrorCode::Internal, "inference pool closed")
            }
            Err(_) => {
                tracing::debug!("Page {} not dispatched before the deadline", index);
                return PageResult::timed_out(index);
            }
        };

        let started = Instant::now();
        match self.client.infer(&page.image_bytes, &options.inference).await {
            Ok(output) => {
                tracing::debug!(
                    "Page {} inferred in {:?} ({} chars)",
                    index,
                    started.elapsed(),
                    output.text.len()
                );
                let metrics = options.include_metrics.then(|| compute_metrics(&output.text));
                PageResult::succeeded(index, output, metrics)
            }
            Err(e) => {
                tracing::warn!("Inference failed for page {}: {}", index, e);
                let code = match e {
                    InferenceError::Timeout(_) => ErrorCode::Timeout,
                    _ => ErrorCode::InferenceFailed,
                };
                PageResult::failed(index, code, e.to_string())
            }
        }
    }
}
