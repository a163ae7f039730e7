mod analysis;
mod config;
mod errors;
mod history;
mod llm_client;
mod models;
mod pdf;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::client::AnalysisClient;
use crate::config::Config;
use crate::history::SessionHistory;
use crate::llm_client::LlmClient;
use crate::pdf::Rasterizer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing API key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HireLens API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        &config.openai_base_url,
        config.llm_model.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )
    .context("Failed to initialize AI client")?;
    info!(
        "LLM client initialized (model: {}, endpoint: {})",
        llm.model(),
        config.openai_base_url
    );

    // Pick the page renderer once: pdfium if it binds, placeholder pages otherwise
    let rasterizer = Rasterizer::detect(config.pdfium_library_path.as_deref());

    // One history per process; dropped at shutdown
    let history = SessionHistory::new(config.history_limit);
    info!("Session history initialized (limit: {})", config.history_limit);

    // Build app state
    let state = AppState {
        config: config.clone(),
        analysis: AnalysisClient::new(Arc::new(llm)),
        rasterizer,
        history,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
