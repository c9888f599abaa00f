//! Errors raised while invoking a loaded model.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("expected {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("model produced a non-finite prediction ({0})")]
    NonFinite(f64),

    #[error("invalid tree: {0}")]
    InvalidTree(String),
}
