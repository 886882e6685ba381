//! Page dispatch and result aggregation
//!
//! - `aggregator`: bounded-concurrency inference over page units
//! - `extraction`: the end-to-end resolve/split/aggregate run for a request
//! - `types`: page and aggregate results

mod aggregator;
mod extraction;
mod types;

pub use aggregator::{AggregateOptions, ResultAggregator};
pub use extraction::{ExtractionOutcome, ExtractionPipeline};
pub use types::{AggregateResult, PageResult, PageStatus, TIMEOUT_DETAIL};
