//! The Prediction Service: runs every registered model against one patient
//! record and labels each result.
//!
//! Failures are per biomarker. A record missing CRP's features still gets
//! Ferritin, B12, ... predictions; the CRP entry carries a note instead.

use labsight_common::{Biomarker, Sex};
use labsight_models::{BiomarkerSpec, ModelRegistry};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::classify::CLASSIFICATION_ERROR_STATUS;
use crate::ranges::{RangeError, RangeTable};
use crate::record::{FeatureEncoding, PatientRecord};

/// Render names as a bracketed, single-quoted list: `['albumin', 'ggt']`.
fn quoted_list(names: &[String]) -> String {
    let inner: Vec<String> = names.iter().map(|n| format!("'{}'", n)).collect();
    format!("[{}]", inner.join(", "))
}

/// Why a single biomarker has no prediction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PredictionError {
    #[error("Missing features: {}", quoted_list(.0))]
    MissingFeatures(Vec<String>),

    #[error("Model invocation failed: {0}")]
    ModelInvocation(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub value: f64,
    pub status: String,
}

/// Result for one biomarker: a labelled value, or a note explaining why not.
#[derive(Debug, Clone, PartialEq)]
pub enum BiomarkerOutcome {
    Prediction(PredictionResult),
    Failed(PredictionError),
}

impl BiomarkerOutcome {
    pub fn prediction(&self) -> Option<&PredictionResult> {
        match self {
            BiomarkerOutcome::Prediction(p) => Some(p),
            BiomarkerOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&PredictionError> {
        match self {
            BiomarkerOutcome::Prediction(_) => None,
            BiomarkerOutcome::Failed(e) => Some(e),
        }
    }
}

/// Predictions serialize as `{"value": .., "status": ..}`, failures as a
/// plain string note.
impl Serialize for BiomarkerOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BiomarkerOutcome::Prediction(p) => p.serialize(serializer),
            BiomarkerOutcome::Failed(e) => serializer.collect_str(e),
        }
    }
}

pub type Predictions = BTreeMap<Biomarker, BiomarkerOutcome>;

pub struct PredictionService {
    registry: ModelRegistry,
    ranges: RangeTable,
    encoding: FeatureEncoding,
}

impl PredictionService {
    pub fn new(registry: ModelRegistry) -> Self {
        Self {
            registry,
            ranges: RangeTable::STANDARD,
            encoding: FeatureEncoding::default(),
        }
    }

    pub fn with_encoding(mut self, encoding: FeatureEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Replace the reference ranges; an unordered table is rejected.
    pub fn with_ranges(mut self, ranges: RangeTable) -> Result<Self, RangeError> {
        ranges.validate()?;
        self.ranges = ranges;
        Ok(self)
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Predict and classify every registered biomarker for `record`.
    pub fn predict(&self, record: &PatientRecord) -> Predictions {
        let sex = record.sex();
        self.registry
            .iter()
            .map(|spec| (spec.biomarker, self.predict_spec(spec, record, sex)))
            .collect()
    }

    /// Predict a single biomarker; `None` if it is not registered.
    pub fn predict_biomarker(
        &self,
        biomarker: Biomarker,
        record: &PatientRecord,
    ) -> Option<BiomarkerOutcome> {
        self.registry
            .get(biomarker)
            .map(|spec| self.predict_spec(spec, record, record.sex()))
    }

    fn predict_spec(&self, spec: &BiomarkerSpec, record: &PatientRecord, sex: Sex) -> BiomarkerOutcome {
        let missing = record.missing(&spec.required_features);
        if !missing.is_empty() {
            debug!("{}: {} required features missing", spec.biomarker, missing.len());
            return BiomarkerOutcome::Failed(PredictionError::MissingFeatures(
                missing.into_iter().map(String::from).collect(),
            ));
        }

        let value = match record
            .feature_vector(&spec.required_features, &self.encoding)
            .map_err(|e| e.to_string())
            .and_then(|x| spec.model.predict(&x).map_err(|e| e.to_string()))
        {
            Ok(v) => v,
            Err(reason) => {
                warn!("{} model invocation failed: {}", spec.biomarker, reason);
                return BiomarkerOutcome::Failed(PredictionError::ModelInvocation(reason));
            }
        };

        let status = match self.ranges.classify(spec.biomarker, value, sex) {
            Ok(category) => category.as_str().to_string(),
            Err(e) => {
                warn!("{} classification failed: {}", spec.biomarker, e);
                CLASSIFICATION_ERROR_STATUS.to_string()
            }
        };

        BiomarkerOutcome::Prediction(PredictionResult { value, status })
    }
}
