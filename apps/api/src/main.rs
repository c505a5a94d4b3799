mod config;
mod errors;
mod models;
mod providers;
mod routes;
mod screening;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::providers::{gemini::GeminiProvider, openai::OpenAiProvider, ProviderGate, RetryPolicy};
use crate::routes::build_router;
use crate::screening::aggregator::AggregationWeights;
use crate::screening::pipeline::ScreeningPipeline;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting screening API v{}", env!("CARGO_PKG_VERSION"));

    // Provider adapters, sharing one process-wide concurrency gate
    let openai = Arc::new(OpenAiProvider::new(
        config.openai_api_key.clone(),
        config.openai_model.clone(),
    ));
    let gemini = Arc::new(GeminiProvider::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
    ));
    let gate = ProviderGate::new(config.max_concurrent_provider_calls);
    info!(
        openai_model = %config.openai_model,
        gemini_model = %config.gemini_model,
        max_in_flight = config.max_concurrent_provider_calls,
        "provider adapters initialized"
    );

    let pipeline = ScreeningPipeline::new(
        openai,
        gemini,
        gate,
        RetryPolicy::default(),
        AggregationWeights {
            openai: config.provider_weight_openai,
            gemini: config.provider_weight_gemini,
        },
    );

    let state = AppState {
        config: config.clone(),
        pipeline: Arc::new(pipeline),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
