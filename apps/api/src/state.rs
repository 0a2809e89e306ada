use std::sync::Arc;

use crate::config::Config;
use crate::extraction::PageTextSource;
use crate::llm_client::ModelProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Builds a per-run model handle from the request's credential.
    pub models: Arc<dyn ModelProvider>,
    /// PDF text source. Default: pdf-extract.
    pub pdf: Arc<dyn PageTextSource>,
}
