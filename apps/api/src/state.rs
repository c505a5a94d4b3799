use std::sync::Arc;

use crate::config::Config;
use crate::screening::pipeline::ScreeningPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// The evaluation pipeline. Holds both provider adapters and the
    /// process-wide concurrency gate.
    pub pipeline: Arc<ScreeningPipeline>,
}
