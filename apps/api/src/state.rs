use std::sync::Arc;

use crate::pipeline::Pipeline;

/// Shared application state injected into route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}
