//! labsight-predict — Prediction Service and reference-range classification.
//!
//! For every biomarker in the registry: check the record carries the model's
//! features, run the model, and label the value against static ranges.

pub mod classify;
pub mod ranges;
pub mod record;
pub mod service;

pub use classify::{Category, ClassificationError, CLASSIFICATION_ERROR_STATUS};
pub use ranges::{RangeError, RangeTable};
pub use record::{EncodingError, FeatureEncoding, PatientRecord, RecordError};
pub use service::{BiomarkerOutcome, PredictionError, PredictionResult, PredictionService, Predictions};
