mod config;
mod errors;
mod extraction;
mod llm_client;
mod routes;
mod screening;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::PdfExtractSource;
use crate::llm_client::GeminiProvider;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting AutoHR API v{}", env!("CARGO_PKG_VERSION"));

    let models = GeminiProvider::new(config.gemini_api_base.clone())?;
    info!(
        "LLM provider initialized (model: {}, base: {})",
        llm_client::MODEL,
        config.gemini_api_base
    );
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY not set; requests must supply the x-api-key header");
    }

    let state = AppState {
        config: config.clone(),
        models: Arc::new(models),
        pdf: Arc::new(PdfExtractSource),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the recruiter UI has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
