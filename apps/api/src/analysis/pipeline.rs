//! Analysis pipeline: validate → rasterize → extract + analyze → parse → record.
//!
//! A record is appended to the session history only when every stage succeeds.

use serde::Serialize;
use tracing::info;

use crate::analysis::client::{AnalysisClient, AnalysisError, ExtractionSource};
use crate::analysis::mode::AnalysisMode;
use crate::analysis::parser::{extract_job_title, extract_score, ScoreBand};
use crate::errors::AppError;
use crate::history::SessionHistory;
use crate::models::analysis::AnalysisRecord;
use crate::pdf::{Rasterizer, UploadedPdf};

/// One user action: a resume, the job it is measured against, and a mode.
#[derive(Debug, Clone)]
pub struct ResumeSubmission {
    pub upload: UploadedPdf,
    pub job_description: String,
    pub mode: AnalysisMode,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    /// Raw model response.
    pub analysis: String,
    pub extraction: ExtractionSource,
    pub pages_analyzed: usize,
    pub score: Option<u8>,
    pub band: Option<ScoreBand>,
    pub record: AnalysisRecord,
}

/// Borrowed view of the services an analysis needs.
#[derive(Clone, Copy)]
pub struct Pipeline<'a> {
    pub client: &'a AnalysisClient,
    pub rasterizer: &'a Rasterizer,
    pub history: &'a SessionHistory,
}

impl Pipeline<'_> {
    pub async fn run(&self, submission: ResumeSubmission) -> Result<AnalysisOutcome, AppError> {
        let ResumeSubmission {
            upload,
            job_description,
            mode,
        } = submission;

        upload.validate()?;
        if job_description.trim().is_empty() {
            return Err(AnalysisError::EmptyJobDescription.into());
        }

        info!(file = %upload.name, size = upload.size(), %mode, "Starting resume analysis");

        // Rendering is CPU-bound; keep it off the async executor.
        let rasterizer = self.rasterizer.clone();
        let pages = tokio::task::spawn_blocking(move || rasterizer.rasterize(&upload))
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("spawn_blocking failed in rasterization: {e}"))
            })??;

        let output = self.client.analyze(&job_description, &pages, mode).await?;

        let score = mode.is_scored().then(|| extract_score(&output.text));
        let job_title = extract_job_title(&job_description);
        let record = AnalysisRecord::new(job_title, score, mode, &output.text);
        self.history.append(record.clone());

        info!(
            %mode,
            score = ?score,
            job_title = record.job_title(),
            extraction = ?output.extraction,
            "Resume analysis complete"
        );

        Ok(AnalysisOutcome {
            analysis: output.text,
            extraction: output.extraction,
            pages_analyzed: pages.len(),
            score,
            band: score.map(ScoreBand::for_score),
            record,
        })
    }
}
