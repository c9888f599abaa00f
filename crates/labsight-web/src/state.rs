//! Shared application state for the web server.

use labsight_predict::PredictionService;
use std::sync::Arc;

/// Shared state injected into every Axum handler. Built once at startup and
/// never mutated, so handlers share it without locking.
pub struct AppState {
    pub service: PredictionService,
}

impl AppState {
    pub fn new(service: PredictionService) -> Self {
        Self { service }
    }
}

pub type SharedState = Arc<AppState>;
