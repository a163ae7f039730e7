//! Analysis Client: orchestrates the two LLM stages of an analysis.
//!
//! 1. Extraction: one vision call per page image. Any transport failure switches
//!    the whole step to a non-vision fallback that cannot see the pages and
//!    answers with a generic template. The degraded text is used as-is.
//! 2. Analysis: one completion with the mode's prompt over the extracted text.
//!
//! Degraded extraction is reported through `ExtractionSource`, never hidden.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analysis::mode::AnalysisMode;
use crate::analysis::prompts::{build_prompt, EXTRACTION_INSTRUCTION, FALLBACK_EXTRACTION_PROMPT};
use crate::llm_client::prompts::{ANALYST_SYSTEM, CONNECTION_PROBE};
use crate::llm_client::{ChatBackend, ChatMessage, CompletionRequest, LlmError};
use crate::models::page::PageImage;

/// Extracted text shorter than this (after trimming) is rejected.
pub const MIN_EXTRACTED_CHARS: usize = 50;

const VISION_MAX_TOKENS: u32 = 1500;
const FALLBACK_MAX_TOKENS: u32 = 500;
const ANALYSIS_MAX_TOKENS: u32 = 2000;
const ANALYSIS_TEMPERATURE: f32 = 0.7;
const PROBE_MAX_TOKENS: u32 = 20;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Please provide a job description to analyze against.")]
    EmptyJobDescription,

    #[error("No resume content found. Please upload a valid PDF resume.")]
    NoPages,

    #[error("Could not extract sufficient text from the resume. Please ensure your PDF contains clear, selectable text.")]
    InsufficientText,

    #[error("Analysis failed: {0}")]
    RemoteCall(#[from] LlmError),
}

/// Where the resume text fed into the analysis prompt came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionSource {
    /// Transcribed from the page images.
    Vision,
    /// Generic text from the non-vision fallback; not resume-specific.
    Fallback,
    /// Both extraction paths failed; a fixed notice stands in for the text.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedText {
    pub text: String,
    pub source: ExtractionSource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutput {
    /// The model's raw response.
    pub text: String,
    pub extraction: ExtractionSource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionStatus {
    pub ok: bool,
    pub message: String,
}

#[derive(Clone)]
pub struct AnalysisClient {
    backend: Arc<dyn ChatBackend>,
}

impl AnalysisClient {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// Runs extraction and analysis for one request. Returns the raw model text.
    pub async fn analyze(
        &self,
        job_description: &str,
        pages: &[PageImage],
        mode: AnalysisMode,
    ) -> Result<AnalysisOutput, AnalysisError> {
        if job_description.trim().is_empty() {
            return Err(AnalysisError::EmptyJobDescription);
        }
        if pages.is_empty() {
            return Err(AnalysisError::NoPages);
        }

        let extracted = self.extract_text(pages).await;
        if extracted.text.trim().chars().count() < MIN_EXTRACTED_CHARS {
            return Err(AnalysisError::InsufficientText);
        }

        let prompt = build_prompt(mode, job_description, &extracted.text);
        let request = CompletionRequest::new(
            vec![ChatMessage::system(ANALYST_SYSTEM), ChatMessage::user(prompt)],
            ANALYSIS_MAX_TOKENS,
        )
        .with_temperature(ANALYSIS_TEMPERATURE);

        info!(%mode, pages = pages.len(), extraction = ?extracted.source, "Requesting analysis");
        let text = self.backend.complete(&request).await?;

        Ok(AnalysisOutput {
            text,
            extraction: extracted.source,
        })
    }

    /// Never fails: vision first, then the non-vision fallback, then a fixed notice.
    pub async fn extract_text(&self, pages: &[PageImage]) -> ExtractedText {
        match self.extract_with_vision(pages).await {
            Ok(text) => ExtractedText {
                text,
                source: ExtractionSource::Vision,
            },
            Err(e) => {
                warn!("Vision text extraction failed ({e}); falling back to text-only extraction");
                self.extract_without_vision(pages).await
            }
        }
    }

    async fn extract_with_vision(&self, pages: &[PageImage]) -> Result<String, LlmError> {
        let mut all_text = String::new();

        for page in pages {
            let request = CompletionRequest::new(
                vec![ChatMessage::user_with_image(
                    EXTRACTION_INSTRUCTION,
                    page.mime_type,
                    &page.data,
                )],
                VISION_MAX_TOKENS,
            );

            match self.backend.complete(&request).await {
                Ok(text) => {
                    all_text.push_str(&format!("\n\n--- Page {} ---\n{}", page.page_number, text));
                }
                Err(LlmError::EmptyContent) => {
                    debug!(page = page.page_number, "Vision extraction returned no text");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(all_text)
    }

    async fn extract_without_vision(&self, pages: &[PageImage]) -> ExtractedText {
        let mut all_text = String::new();

        for _ in pages {
            let request = CompletionRequest::new(
                vec![ChatMessage::user(FALLBACK_EXTRACTION_PROMPT)],
                FALLBACK_MAX_TOKENS,
            );

            match self.backend.complete(&request).await {
                Ok(text) => {
                    all_text.push_str(&text);
                    all_text.push_str("\n\n");
                }
                Err(LlmError::EmptyContent) => {}
                Err(e) => {
                    warn!("Text-only extraction failed ({e}); using page-count notice");
                    return ExtractedText {
                        text: unavailable_notice(pages.len()),
                        source: ExtractionSource::Unavailable,
                    };
                }
            }
        }

        ExtractedText {
            text: all_text,
            source: ExtractionSource::Fallback,
        }
    }

    /// Minimal completion used as a reachability probe.
    pub async fn test_connection(&self) -> ConnectionStatus {
        let request =
            CompletionRequest::new(vec![ChatMessage::user(CONNECTION_PROBE)], PROBE_MAX_TOKENS);

        match self.backend.complete(&request).await {
            Ok(_) => ConnectionStatus {
                ok: true,
                message: "AI connection successful! Model is working.".to_string(),
            },
            Err(e) => ConnectionStatus {
                ok: false,
                message: format!("Connection failed: {e}"),
            },
        }
    }
}

fn unavailable_notice(page_count: usize) -> String {
    format!(
        "Resume with {page_count} pages. Please ensure your PDF contains selectable text for best results."
    )
}
