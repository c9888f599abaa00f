//! labsight-models — Inference-only regression models for the six biomarkers.
//!
//! Training happens elsewhere; trainers export each fitted model to a JSON
//! artifact (`<biomarker>_model.json`) which is loaded once at startup into
//! an immutable [`ModelRegistry`].
//!
//! Supported model kinds:
//! - `linear`: intercept + coefficients, with optional standard scaling
//! - `tree_ensemble`: boosted (summed) or bagged (averaged) regression trees

pub mod artifact;
pub mod error;
pub mod model;
pub mod registry;

pub use artifact::ModelArtifact;
pub use error::ModelError;
pub use model::{LinearModel, ModelDef, RegressionModel, TreeEnsemble};
pub use registry::{BiomarkerSpec, ModelRegistry, ModelSummary};
