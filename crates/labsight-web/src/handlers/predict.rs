//! `POST /predict` — predictions for one patient's lab panel.

use axum::{body::Bytes, extract::State, Json};
use labsight_predict::{PatientRecord, Predictions};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predictions: Predictions,
}

/// The body is parsed by hand rather than through `Json<T>` so that an empty
/// or non-object body maps onto the service's own error messages, whatever
/// the Content-Type.
pub async fn predict(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<PredictResponse>, ApiError> {
    let record = PatientRecord::from_slice(&body)?;
    tracing::debug!("Predicting from {} submitted values", record.len());

    let predictions = state.service.predict(&record);
    let failed = predictions.values().filter(|o| o.error().is_some()).count();
    if failed > 0 {
        tracing::info!("{} of {} biomarkers could not be predicted", failed, predictions.len());
    }

    Ok(Json(PredictResponse { predictions }))
}
