//! Response assembly
//!
//! Maps an extraction outcome onto the two public response shapes:
//! the per-page full analysis and the concatenated simple extraction.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::InferenceConfig;
use crate::error::ErrorCode;
use crate::inference::{LayoutInfo, OutputFormat};
use crate::metrics::{compute_metrics, CharacterMetrics};
use crate::pipeline::{ExtractionOutcome, PageResult, PageStatus};

/// Joins page texts in the simple response
pub const PAGE_SEPARATOR: &str = "\n\n";

#[derive(Debug, Serialize)]
pub struct FullAnalysisResponse {
    pub success: bool,
    pub results: Vec<PageAnalysis>,
    pub total_pages: usize,
    pub processing_info: ProcessingInfo,
}

#[derive(Debug, Serialize)]
pub struct PageAnalysis {
    pub page_index: usize,
    pub status: PageStatus,
    pub success: bool,
    pub text_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_metrics: Option<CharacterMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure_info: Option<StructureInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_analysis: Option<LayoutInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct StructureInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct SimpleResponse {
    pub success: bool,
    pub extracted_text: String,
    pub word_count: usize,
    pub character_count: usize,
    pub character_metrics: CharacterMetrics,
    pub total_pages: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_pages: Vec<FailedPage>,
    pub processing_info: ProcessingInfo,
}

#[derive(Debug, Serialize)]
pub struct FailedPage {
    pub page_index: usize,
    pub error_code: ErrorCode,
    pub error_detail: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FeaturesUsed {
    pub doc_orientation_classify: bool,
    pub doc_unwarping: bool,
    pub layout_detection: bool,
}

#[derive(Debug, Serialize)]
pub struct ProcessingInfo {
    pub model: String,
    pub gpu_accelerated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features_used: Option<FeaturesUsed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,
    pub source: String,
    pub media_type: String,
    pub document_sha256: String,
    pub elapsed_ms: u64,
    pub processed_at: DateTime<Utc>,
}

/// Static service description mixed into every response
#[derive(Debug, Clone)]
pub struct ResponseAssembler {
    model: String,
    gpu_accelerated: bool,
    doc_orientation_classify: bool,
    doc_unwarping: bool,
}

impl ResponseAssembler {
    pub fn new(config: &InferenceConfig) -> Self {
        Self {
            model: config.model.clone(),
            gpu_accelerated: config.gpu_accelerated,
            doc_orientation_classify: config.doc_orientation_classify,
            doc_unwarping: config.doc_unwarping,
        }
    }

    pub fn full_analysis(
        &self,
        outcome: ExtractionOutcome,
        output_format: OutputFormat,
        layout_requested: bool,
    ) -> FullAnalysisResponse {
        let mut info = self.processing_info(&outcome);
        info.features_used = Some(FeaturesUsed {
            doc_orientation_classify: self.doc_orientation_classify,
            doc_unwarping: self.doc_unwarping,
            layout_detection: layout_requested,
        });
        info.output_format = Some(output_format);

        let success = outcome.aggregate.overall_success;
        let results: Vec<PageAnalysis> = outcome
            .aggregate
            .page_results
            .into_iter()
            .map(|page| page_analysis(page, output_format))
            .collect();

        FullAnalysisResponse {
            success,
            total_pages: results.len(),
            results,
            processing_info: info,
        }
    }

    pub fn simple(&self, outcome: ExtractionOutcome) -> SimpleResponse {
        let mut info = self.processing_info(&outcome);
        info.mode = Some("simple_extraction");

        let pages = &outcome.aggregate.page_results;
        let extracted_text = pages
            .iter()
            .filter(|p| p.is_ok() && !p.text.is_empty())
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join(PAGE_SEPARATOR);

        // Computed over the joined text, not summed per page
        let character_metrics = compute_metrics(&extracted_text);

        let failed_pages = pages
            .iter()
            .filter(|p| !p.is_ok())
            .map(|p| FailedPage {
                page_index: p.index,
                error_code: p.error_code.unwrap_or(ErrorCode::InferenceFailed),
                error_detail: p.error_detail.clone().unwrap_or_default(),
            })
            .collect();

        SimpleResponse {
            success: outcome.aggregate.overall_success,
            word_count: character_metrics.word_count,
            character_count: character_metrics.character_count,
            character_metrics,
            extracted_text,
            total_pages: pages.len(),
            failed_pages,
            processing_info: info,
        }
    }

    fn processing_info(&self, outcome: &ExtractionOutcome) -> ProcessingInfo {
        ProcessingInfo {
            model: self.model.clone(),
            gpu_accelerated: self.gpu_accelerated,
            mode: None,
            features_used: None,
            output_format: None,
            source: outcome.source.clone(),
            media_type: outcome.media_type.clone(),
            document_sha256: outcome.document_sha256.clone(),
            elapsed_ms: outcome.elapsed.as_millis() as u64,
            processed_at: Utc::now(),
        }
    }
}

fn page_analysis(page: PageResult, output_format: OutputFormat) -> PageAnalysis {
    let ok = page.is_ok();
    PageAnalysis {
        page_index: page.index,
        status: page.status,
        success: ok,
        text_content: page.text,
        character_metrics: page.metrics,
        structure_info: ok.then(|| StructureInfo {
            json: page.structure,
        }),
        layout_analysis: page.layout,
        markdown: page
            .markdown
            .filter(|_| output_format == OutputFormat::Markdown),
        error_code: page.error_code,
        error_detail: page.error_detail,
    }
}
