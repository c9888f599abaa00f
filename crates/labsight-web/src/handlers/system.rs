//! Liveness check and registry introspection.

use axum::{extract::State, Json};
use labsight_models::ModelSummary;
use serde::Serialize;

use crate::state::SharedState;

pub const HOME_TEXT: &str = "Hello World! Testing on the server MHOC";

/// GET /home
pub async fn home() -> &'static str {
    HOME_TEXT
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub count: usize,
    pub models: Vec<ModelSummary>,
}

/// GET /models — what was loaded at startup
pub async fn models(State(state): State<SharedState>) -> Json<ModelsResponse> {
    let models = state.service.registry().summary();
    Json(ModelsResponse { count: models.len(), models })
}
