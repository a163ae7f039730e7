pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::history::handlers as history;
use crate::pdf::MAX_PDF_BYTES;
use crate::state::AppState;

/// Leaves headroom above the PDF ceiling so oversize files reach validation.
const MAX_BODY_BYTES: usize = MAX_PDF_BYTES as usize + 2 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/llm/status", get(analysis::handle_llm_status))
        // Analysis API
        .route("/api/v1/resumes/inspect", post(analysis::handle_inspect))
        .route("/api/v1/analyses", post(analysis::handle_analyze))
        .route("/api/v1/analyses/export", post(analysis::handle_export))
        // History API
        .route(
            "/api/v1/history",
            get(history::handle_get_history).delete(history::handle_clear_history),
        )
        .route("/api/v1/history/stats", get(history::handle_history_stats))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
