//! The six predicted biomarkers and the feature table each model consumes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LabsightError;

/// A blood biomarker with a dedicated regression model.
///
/// Declaration order is the order used for registry iteration and for the
/// keys of a prediction response.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Biomarker {
    Ferritin,
    B12,
    CRP,
    #[serde(rename = "Cystatin_C")]
    CystatinC,
    HBA1C,
    AFP,
}

impl Biomarker {
    pub const ALL: [Biomarker; 6] = [
        Biomarker::Ferritin,
        Biomarker::B12,
        Biomarker::CRP,
        Biomarker::CystatinC,
        Biomarker::HBA1C,
        Biomarker::AFP,
    ];

    /// Wire name, as it appears in artifacts and responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Biomarker::Ferritin  => "Ferritin",
            Biomarker::B12       => "B12",
            Biomarker::CRP       => "CRP",
            Biomarker::CystatinC => "Cystatin_C",
            Biomarker::HBA1C     => "HBA1C",
            Biomarker::AFP       => "AFP",
        }
    }

    /// File stem of the model artifact, e.g. `cystatin_c` for `cystatin_c_model.json`.
    pub fn artifact_stem(&self) -> &'static str {
        match self {
            Biomarker::Ferritin  => "ferritin",
            Biomarker::B12       => "b12",
            Biomarker::CRP       => "crp",
            Biomarker::CystatinC => "cystatin_c",
            Biomarker::HBA1C     => "hba1c",
            Biomarker::AFP       => "afp",
        }
    }

    pub fn artifact_file_name(&self) -> String {
        format!("{}_model.json", self.artifact_stem())
    }

    /// Ordered feature names the model for this biomarker was trained on.
    /// Models are order-sensitive; never reorder these.
    pub fn required_features(&self) -> &'static [&'static str] {
        match self {
            Biomarker::Ferritin => &[
                "age", "sex", "hb", "hct", "rbc", "mcv", "mch", "mchc", "wbc", "alt", "ast",
            ],
            Biomarker::B12 => &["age", "hb", "hct", "rbc", "mcv", "mch"],
            Biomarker::CRP => &[
                "wbc", "neutrophils", "lymphocytes", "alt", "ast", "ggt", "albumin",
            ],
            Biomarker::CystatinC => &["age", "sex", "urea", "creatinine", "egfr", "albumin"],
            Biomarker::HBA1C => &[
                "age", "fpg", "triglycerides", "cholesterol_total", "hdl", "ldl",
                "alt", "ast", "hb", "hct", "rbc", "mcv", "mch", "mchc",
            ],
            Biomarker::AFP => &[
                "age", "sex", "alt", "ast", "alp", "ggt",
                "bilirubin_total", "bilirubin_direct", "albumin",
            ],
        }
    }
}

impl fmt::Display for Biomarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Biomarker {
    type Err = LabsightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Biomarker::ALL
            .iter()
            .copied()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| LabsightError::UnknownBiomarker(s.to_string()))
    }
}

/// Patient sex as far as the reference ranges care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    #[default]
    Female,
}

impl Sex {
    /// Interpret a free-text sex label. Anything starting with "M"
    /// (case-insensitive) is male; everything else, including an absent
    /// label, takes the female path.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.and_then(|l| l.chars().next()) {
            Some(c) if c.to_ascii_uppercase() == 'M' => Sex::Male,
            _ => Sex::Female,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_round_trip() {
        for b in Biomarker::ALL {
            assert_eq!(b.as_str().parse::<Biomarker>().unwrap(), b);
        }
        assert_eq!(serde_json::to_string(&Biomarker::CystatinC).unwrap(), "\"Cystatin_C\"");
    }

    #[test]
    fn test_unknown_biomarker_rejected() {
        assert!("Cystatin C".parse::<Biomarker>().is_err());
        assert!("ferritin".parse::<Biomarker>().is_err());
    }

    #[test]
    fn test_artifact_file_names() {
        assert_eq!(Biomarker::CystatinC.artifact_file_name(), "cystatin_c_model.json");
        assert_eq!(Biomarker::HBA1C.artifact_file_name(), "hba1c_model.json");
    }

    #[test]
    fn test_feature_tables_have_no_duplicates() {
        for b in Biomarker::ALL {
            let features = b.required_features();
            let mut sorted = features.to_vec();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), features.len(), "{} lists a feature twice", b);
        }
    }

    #[test]
    fn test_sex_prefix_is_case_insensitive() {
        assert_eq!(Sex::from_label(Some("M")), Sex::Male);
        assert_eq!(Sex::from_label(Some("male")), Sex::Male);
        assert_eq!(Sex::from_label(Some("mAlE")), Sex::Male);
        assert_eq!(Sex::from_label(Some("F")), Sex::Female);
        assert_eq!(Sex::from_label(Some("")), Sex::Female);
        assert_eq!(Sex::from_label(Some(" M")), Sex::Female);
        assert_eq!(Sex::from_label(None), Sex::Female);
    }
}
