//! Per-page and aggregate results

use serde::Serialize;

use crate::error::ErrorCode;
use crate::inference::{InferenceOutput, LayoutInfo};
use crate::metrics::CharacterMetrics;

/// Detail recorded for pages that missed the request deadline
pub const TIMEOUT_DETAIL: &str = "timeout";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Ok,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    pub index: usize,
    pub status: PageStatus,
    /// Empty for failed pages
    pub text: String,
    pub metrics: Option<CharacterMetrics>,
    pub layout: Option<LayoutInfo>,
    pub markdown: Option<String>,
    pub structure: Option<serde_json::Value>,
    pub error_code: Option<ErrorCode>,
    pub error_detail: Option<String>,
}

impl PageResult {
    pub fn succeeded(index: usize, output: InferenceOutput, metrics: Option<CharacterMetrics>) -> Self {
        Self {
            index,
            status: PageStatus::Ok,
            text: output.text,
            metrics,
            layout: output.layout,
            markdown: output.markdown,
            structure: output.structure,
            error_code: None,
            error_detail: None,
        }
    }

    pub fn failed(index: usize, code: ErrorCode, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self {
            index,
            status: PageStatus::Failed,
            text: String::new(),
            metrics: None,
            layout: None,
            markdown: None,
            structure: None,
            error_code: Some(code),
            error_detail: Some(if detail.is_empty() {
                code.as_str().to_string()
            } else {
                detail
            }),
        }
    }

    pub fn timed_out(index: usize) -> Self {
        Self::failed(index, ErrorCode::Timeout, TIMEOUT_DETAIL)
    }

    pub fn is_ok(&self) -> bool {
        self.status == PageStatus::Ok
    }
}

/// Ordered page results for one request
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    pub page_results: Vec<PageResult>,
    pub overall_success: bool,
}

impl AggregateResult {
    pub fn new(page_results: Vec<PageResult>) -> Self {
        let overall_success = page_results.iter().all(PageResult::is_ok);
        Self {
            page_results,
            overall_success,
        }
    }

    pub fn failed_count(&self) -> usize {
        self.page_results.iter().filter(|p| !p.is_ok()).count()
    }
}
