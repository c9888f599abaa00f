//! On-disk model artifacts.
//!
//! Each biomarker has one JSON file exported by the training pipeline:
//!
//! ```json
//! {
//!   "biomarker": "CRP",
//!   "features": ["wbc", "neutrophils", "lymphocytes", "alt", "ast", "ggt", "albumin"],
//!   "model": { "type": "linear", "intercept": 0.4, "coefficients": [...] }
//! }
//! ```

use labsight_common::{Biomarker, LabsightError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::model::ModelDef;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub biomarker: Biomarker,
    /// Feature order the model was fitted on.
    pub features: Vec<String>,
    pub model: ModelDef,
}

impl ModelArtifact {
    /// Read and parse an artifact without checking it against a biomarker.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LabsightError::artifact(path, format!("cannot read: {}", e)))?;
        serde_json::from_str(&content)
            .map_err(|e| LabsightError::artifact(path, format!("malformed JSON: {}", e)))
    }

    /// Read, parse and validate the artifact expected for `biomarker`.
    pub fn load(path: &Path, biomarker: Biomarker) -> Result<Self> {
        let artifact = Self::from_path(path)?;
        artifact
            .validate(biomarker)
            .map_err(|reason| LabsightError::artifact(path, reason))?;
        Ok(artifact)
    }

    /// The artifact must describe `expected`, list exactly that biomarker's
    /// feature table in order, and carry model parameters of matching size.
    pub fn validate(&self, expected: Biomarker) -> std::result::Result<(), String> {
        if self.biomarker != expected {
            return Err(format!(
                "artifact is for {} but was loaded as {}",
                self.biomarker, expected
            ));
        }

        let required = expected.required_features();
        if self.features.len() != required.len()
            || self.features.iter().zip(required).any(|(a, b)| a != b)
        {
            return Err(format!(
                "feature list {:?} does not match the {} feature table {:?}",
                self.features, expected, required
            ));
        }

        self.model.validate(self.features.len())
    }
}
