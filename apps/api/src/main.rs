mod config;
mod db;
mod errors;
mod evaluator;
mod extractor;
mod models;
mod notifier;
mod pipeline;
mod routes;
mod source;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::evaluator::LlmEvaluator;
use crate::extractor::DriveResumeExtractor;
use crate::notifier::SmtpNotifier;
use crate::pipeline::{Pipeline, ScreeningPolicy};
use crate::routes::build_router;
use crate::source::SheetsSource;
use crate::state::AppState;
use crate::store::PgCandidateStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Recruiter API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Wire the pipeline's collaborators
    let source = Arc::new(SheetsSource::new(&config));
    let extractor = Arc::new(DriveResumeExtractor::new());
    let llm = Arc::new(LlmEvaluator::new(config.anthropic_api_key.clone()));
    info!("Evaluator initialized (model: {})", evaluator::MODEL);
    let notifier = Arc::new(SmtpNotifier::new(&config));
    let store = Arc::new(PgCandidateStore::new(db.clone()));

    let pipeline = Arc::new(Pipeline::new(
        source,
        extractor,
        llm,
        notifier,
        store,
        ScreeningPolicy::from_config(&config),
    ));
    info!(
        "Pipeline initialized (role: {}, threshold: {})",
        config.target_role, config.eligibility_threshold
    );

    let state = AppState { pipeline };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
