//! labsight-common — Shared types and errors used across all Labsight crates.

pub mod biomarker;
pub mod error;

// Re-export commonly used types
pub use biomarker::{Biomarker, Sex};
pub use error::{LabsightError, Result};
