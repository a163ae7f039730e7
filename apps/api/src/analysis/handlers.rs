//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::analysis::client::ConnectionStatus;
use crate::analysis::export::export_filename;
use crate::analysis::mode::AnalysisMode;
use crate::analysis::pipeline::{AnalysisOutcome, Pipeline, ResumeSubmission};
use crate::errors::AppError;
use crate::pdf::text::text_preview;
use crate::pdf::{PdfInfo, UploadedPdf};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct SubmissionForm {
    upload: Option<UploadedPdf>,
    job_description: Option<String>,
    mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InspectResponse {
    pub file: PdfInfo,
    pub renderer: &'static str,
    /// Text layer preview; `None` for scanned or unreadable PDFs.
    pub text_preview: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub analysis: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyses
///
/// Multipart fields: `resume` (PDF file), `job_description`, `mode` (defaults to `ats_score`).
/// Runs the full pipeline and returns the raw analysis plus the stored record.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisOutcome>, AppError> {
    let form = read_form(multipart).await?;

    let upload = form
        .upload
        .ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;
    let mode = match form.mode.as_deref().map(str::trim) {
        None | Some("") => AnalysisMode::AtsScore,
        Some(raw) => raw
            .parse::<AnalysisMode>()
            .map_err(|e| AppError::Validation(e.to_string()))?,
    };

    let pipeline = Pipeline {
        client: &state.analysis,
        rasterizer: &state.rasterizer,
        history: &state.history,
    };
    let outcome = pipeline
        .run(ResumeSubmission {
            upload,
            job_description: form.job_description.unwrap_or_default(),
            mode,
        })
        .await?;

    Ok(Json(outcome))
}

/// POST /api/v1/resumes/inspect
///
/// Validates an uploaded resume and reports file info and a text preview.
pub async fn handle_inspect(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<InspectResponse>, AppError> {
    let upload = read_form(multipart)
        .await?
        .upload
        .ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;

    upload.validate()?;

    let bytes = upload.bytes.clone();
    // pdf-extract panics on some malformed files; a JoinError just means no preview.
    let text_preview = tokio::task::spawn_blocking(move || text_preview(&bytes))
        .await
        .unwrap_or_default();

    Ok(Json(InspectResponse {
        file: upload.info(),
        renderer: state.rasterizer.backend(),
        text_preview,
    }))
}

/// POST /api/v1/analyses/export
///
/// Returns the analysis text as a downloadable plain-text file.
pub async fn handle_export(Json(request): Json<ExportRequest>) -> Result<Response, AppError> {
    if request.analysis.trim().is_empty() {
        return Err(AppError::Validation("analysis cannot be empty".to_string()));
    }

    let filename = export_filename(&chrono::Local::now());
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        request.analysis,
    )
        .into_response())
}

/// GET /api/v1/llm/status
///
/// Diagnostic probe of the completion endpoint.
pub async fn handle_llm_status(State(state): State<AppState>) -> Json<ConnectionStatus> {
    Json(state.analysis.test_connection().await)
}

async fn read_form(mut multipart: Multipart) -> Result<SubmissionForm, AppError> {
    let mut form = SubmissionForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                form.upload = Some(UploadedPdf::new(file_name, content_type, bytes));
            }
            Some("job_description") => form.job_description = Some(field.text().await?),
            Some("mode") => form.mode = Some(field.text().await?),
            _ => {}
        }
    }

    Ok(form)
}
