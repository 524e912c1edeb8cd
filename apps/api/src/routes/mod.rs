pub mod health;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::models::report::RunReport;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/pipeline/run", post(handle_run_pipeline))
        .with_state(state)
}

/// POST /api/v1/pipeline/run
/// Runs one screening pass. Always 200: a failed run is conveyed by the
/// report's code/message, never as a transport error.
async fn handle_run_pipeline(State(state): State<AppState>) -> Json<RunReport> {
    Json(state.pipeline.run_once().await)
}
