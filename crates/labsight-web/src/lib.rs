//! labsight-web — HTTP surface for the biomarker Prediction Service.
//!   - `POST /predict`  predictions and clinical categories for one patient
//!   - `GET  /home`     liveness check
//!   - `GET  /models`   loaded model registry

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
