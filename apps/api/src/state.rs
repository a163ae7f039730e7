use crate::analysis::client::AnalysisClient;
use crate::config::Config;
use crate::history::SessionHistory;
use crate::pdf::Rasterizer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Wraps the completion backend. Swap the backend to test without a network.
    pub analysis: AnalysisClient,
    /// Chosen once at startup: pdfium when it binds, placeholder pages otherwise.
    pub rasterizer: Rasterizer,
    /// The session's analysis log. Lives as long as the process.
    pub history: SessionHistory,
}
