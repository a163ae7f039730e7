use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::history::HistoryStats;
use crate::models::analysis::AnalysisRecord;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HistoryResponse {
    pub limit: usize,
    pub records: Vec<AnalysisRecord>,
}

/// GET /api/v1/history
pub async fn handle_get_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        limit: state.history.limit(),
        records: state.history.all(),
    })
}

/// GET /api/v1/history/stats
pub async fn handle_history_stats(State(state): State<AppState>) -> Json<HistoryStats> {
    Json(state.history.stats())
}

/// DELETE /api/v1/history
pub async fn handle_clear_history(State(state): State<AppState>) -> StatusCode {
    state.history.clear();
    StatusCode::NO_CONTENT
}
