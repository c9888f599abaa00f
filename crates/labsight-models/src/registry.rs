//! The Model Registry: one fitted model per biomarker, loaded once at startup
//! and read-only for the rest of the process lifetime.

use labsight_common::{Biomarker, LabsightError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::artifact::ModelArtifact;
use crate::model::RegressionModel;

/// A biomarker, the ordered features its model needs, and the model itself.
pub struct BiomarkerSpec {
    pub biomarker: Biomarker,
    pub required_features: Vec<String>,
    pub model: Box<dyn RegressionModel>,
}

impl BiomarkerSpec {
    /// Pair a model with the biomarker's standard feature table.
    pub fn new(biomarker: Biomarker, model: Box<dyn RegressionModel>) -> Self {
        Self {
            biomarker,
            required_features: biomarker
                .required_features()
                .iter()
                .map(|f| f.to_string())
                .collect(),
            model,
        }
    }
}

impl std::fmt::Debug for BiomarkerSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BiomarkerSpec")
            .field("biomarker", &self.biomarker)
            .field("required_features", &self.required_features)
            .field("model", &self.model.kind())
            .finish()
    }
}

impl From<ModelArtifact> for BiomarkerSpec {
    fn from(artifact: ModelArtifact) -> Self {
        Self {
            biomarker: artifact.biomarker,
            required_features: artifact.features,
            model: Box::new(artifact.model),
        }
    }
}

/// Operator-facing description of a loaded model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub biomarker: Biomarker,
    pub features: Vec<String>,
    pub kind: &'static str,
}

#[derive(Debug)]
pub struct ModelRegistry {
    specs: BTreeMap<Biomarker, BiomarkerSpec>,
}

impl ModelRegistry {
    /// Load all six artifacts from `dir`. Any missing or malformed artifact
    /// is an error: serving with a partial registry is not allowed.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(LabsightError::Registry(format!(
                "model directory not found: {}",
                dir.display()
            )));
        }

        let mut specs = Vec::with_capacity(Biomarker::ALL.len());
        for biomarker in Biomarker::ALL {
            let path = dir.join(biomarker.artifact_file_name());
            if !path.is_file() {
                return Err(LabsightError::artifact(&path, "artifact missing"));
            }
            let artifact = ModelArtifact::load(&path, biomarker)?;
            info!(
                "Loaded {} model ({}, {} features) from {}",
                biomarker,
                artifact.model.kind(),
                artifact.features.len(),
                path.display()
            );
            specs.push(BiomarkerSpec::from(artifact));
        }

        Self::from_specs(specs)
    }

    /// Build a registry from already-constructed specs.
    ///
    /// Every biomarker must appear exactly once, with its standard feature
    /// table, and with a model sized for that table.
    pub fn from_specs(specs: impl IntoIterator<Item = BiomarkerSpec>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for spec in specs {
            let required = spec.biomarker.required_features();
            if spec.required_features.iter().map(String::as_str).ne(required.iter().copied()) {
                return Err(LabsightError::Registry(format!(
                    "{} features {:?} do not match the feature table {:?}",
                    spec.biomarker, spec.required_features, required
                )));
            }
            if spec.model.n_features() != required.len() {
                return Err(LabsightError::Registry(format!(
                    "{} model expects {} features, feature table has {}",
                    spec.biomarker,
                    spec.model.n_features(),
                    required.len()
                )));
            }
            let biomarker = spec.biomarker;
            if map.insert(biomarker, spec).is_some() {
                return Err(LabsightError::Registry(format!(
                    "{} registered more than once",
                    biomarker
                )));
            }
        }

        let missing: Vec<&str> = Biomarker::ALL
            .iter()
            .filter(|b| !map.contains_key(*b))
            .map(|b| b.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(LabsightError::Registry(format!(
                "no model registered for {}",
                missing.join(", ")
            )));
        }

        Ok(Self { specs: map })
    }

    pub fn get(&self, biomarker: Biomarker) -> Option<&BiomarkerSpec> {
        self.specs.get(&biomarker)
    }

    /// Specs in biomarker declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &BiomarkerSpec> {
        self.specs.values()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn summary(&self) -> Vec<ModelSummary> {
        self.iter()
            .map(|spec| ModelSummary {
                biomarker: spec.biomarker,
                features: spec.required_features.clone(),
                kind: spec.model.kind(),
            })
            .collect()
    }
}
