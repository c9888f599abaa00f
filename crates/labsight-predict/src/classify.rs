//! Clinical category assignment for predicted biomarker values.
//!
//! All boundaries are exclusive except AFP, whose boundary values belong to
//! the lower category (10.0 is Normal, 20.0 is Mildly High).

use labsight_common::{Biomarker, Sex};
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::ranges::{LowHigh, RangeTable};

/// Status reported when a value cannot be classified.
pub const CLASSIFICATION_ERROR_STATUS: &str = "Error in classification";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Normal,
    LowAbnormal,
    HighAbnormal,
    PreDiabetes,
    Diabetes,
    MildlyHigh,
    ClinicallySignificant,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Normal                => "Normal",
            Category::LowAbnormal           => "Low Abnormal",
            Category::HighAbnormal          => "High Abnormal",
            Category::PreDiabetes           => "Pre-diabetes",
            Category::Diabetes              => "Diabetes",
            Category::MildlyHigh            => "Mildly High",
            Category::ClinicallySignificant => "Clinically Significant",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
pub enum ClassificationError {
    #[error("cannot classify non-finite value {0}")]
    NonFinite(f64),
}

fn low_high(range: &LowHigh, value: f64) -> Category {
    if value < range.low {
        Category::LowAbnormal
    } else if value > range.high {
        Category::HighAbnormal
    } else {
        Category::Normal
    }
}

fn high_only(range: &LowHigh, value: f64) -> Category {
    if value > range.high {
        Category::HighAbnormal
    } else {
        Category::Normal
    }
}

impl RangeTable {
    /// Label `value` for `biomarker`. `sex` only matters for Ferritin.
    pub fn classify(
        &self,
        biomarker: Biomarker,
        value: f64,
        sex: Sex,
    ) -> Result<Category, ClassificationError> {
        if !value.is_finite() {
            return Err(ClassificationError::NonFinite(value));
        }

        let category = match biomarker {
            Biomarker::Ferritin => {
                let range = match sex {
                    Sex::Male => &self.ferritin.male,
                    Sex::Female => &self.ferritin.female,
                };
                low_high(range, value)
            }
            Biomarker::B12 => low_high(&self.b12, value),
            Biomarker::CRP => high_only(&self.crp, value),
            Biomarker::CystatinC => high_only(&self.cystatin_c, value),
            Biomarker::HBA1C => {
                if value < self.hba1c.normal {
                    Category::Normal
                } else if value < self.hba1c.diabetes {
                    Category::PreDiabetes
                } else {
                    Category::Diabetes
                }
            }
            Biomarker::AFP => {
                if value <= self.afp.mild_high {
                    Category::Normal
                } else if value <= self.afp.clinically_high {
                    Category::MildlyHigh
                } else {
                    Category::ClinicallySignificant
                }
            }
        };

        Ok(category)
    }
}

/// Classify against the standard reference ranges.
pub fn classify(biomarker: Biomarker, value: f64, sex: Sex) -> Result<Category, ClassificationError> {
    RangeTable::STANDARD.classify(biomarker, value, sex)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(biomarker: Biomarker, value: f64, sex: Sex) -> &'static str {
        classify(biomarker, value, sex).unwrap().as_str()
    }

    #[test]
    fn test_ferritin_male_thresholds() {
        assert_eq!(status(Biomarker::Ferritin, 29.9, Sex::Male), "Low Abnormal");
        assert_eq!(status(Biomarker::Ferritin, 30.0, Sex::Male), "Normal");
        assert_eq!(status(Biomarker::Ferritin, 400.0, Sex::Male), "Normal");
        assert_eq!(status(Biomarker::Ferritin, 400.1, Sex::Male), "High Abnormal");
    }

    #[test]
    fn test_ferritin_female_thresholds() {
        assert_eq!(status(Biomarker::Ferritin, 14.9, Sex::Female), "Low Abnormal");
        assert_eq!(status(Biomarker::Ferritin, 15.0, Sex::Female), "Normal");
        assert_eq!(status(Biomarker::Ferritin, 150.0, Sex::Female), "Normal");
        assert_eq!(status(Biomarker::Ferritin, 150.5, Sex::Female), "High Abnormal");
        // 200 is normal for men but high for women
        assert_eq!(status(Biomarker::Ferritin, 200.0, Sex::Male), "Normal");
        assert_eq!(status(Biomarker::Ferritin, 200.0, Sex::Female), "High Abnormal");
    }

    #[test]
    fn test_b12_thresholds() {
        assert_eq!(status(Biomarker::B12, 199.0, Sex::Female), "Low Abnormal");
        assert_eq!(status(Biomarker::B12, 200.0, Sex::Female), "Normal");
        assert_eq!(status(Biomarker::B12, 900.0, Sex::Female), "Normal");
        assert_eq!(status(Biomarker::B12, 901.0, Sex::Female), "High Abnormal");
    }

    #[test]
    fn test_crp_and_cystatin_have_no_low_category() {
        assert_eq!(status(Biomarker::CRP, -1.0, Sex::Female), "Normal");
        assert_eq!(status(Biomarker::CRP, 5.0, Sex::Female), "Normal");
        assert_eq!(status(Biomarker::CRP, 5.01, Sex::Female), "High Abnormal");
        assert_eq!(status(Biomarker::CystatinC, 0.1, Sex::Female), "Normal");
        assert_eq!(status(Biomarker::CystatinC, 1.0, Sex::Female), "Normal");
        assert_eq!(status(Biomarker::CystatinC, 1.01, Sex::Female), "High Abnormal");
    }

    #[test]
    fn test_hba1c_bands() {
        assert_eq!(status(Biomarker::HBA1C, 5.69, Sex::Female), "Normal");
        assert_eq!(status(Biomarker::HBA1C, 5.7, Sex::Female), "Pre-diabetes");
        assert_eq!(status(Biomarker::HBA1C, 6.49, Sex::Female), "Pre-diabetes");
        assert_eq!(status(Biomarker::HBA1C, 6.5, Sex::Female), "Diabetes");
    }

    #[test]
    fn test_afp_boundaries_are_inclusive() {
        assert_eq!(status(Biomarker::AFP, 10.0, Sex::Female), "Normal");
        assert_eq!(status(Biomarker::AFP, 10.0001, Sex::Female), "Mildly High");
        assert_eq!(status(Biomarker::AFP, 20.0, Sex::Female), "Mildly High");
        assert_eq!(status(Biomarker::AFP, 20.0001, Sex::Female), "Clinically Significant");
    }

    #[test]
    fn test_sex_ignored_outside_ferritin() {
        for biomarker in Biomarker::ALL.into_iter().filter(|b| *b != Biomarker::Ferritin) {
            for value in [0.5, 5.8, 12.0, 250.0, 1000.0] {
                assert_eq!(
                    classify(biomarker, value, Sex::Male).unwrap(),
                    classify(biomarker, value, Sex::Female).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_non_finite_value_is_an_error() {
        assert!(classify(Biomarker::CRP, f64::NAN, Sex::Female).is_err());
        assert!(classify(Biomarker::AFP, f64::INFINITY, Sex::Female).is_err());
    }

    #[test]
    fn test_category_serializes_as_label() {
        assert_eq!(serde_json::to_string(&Category::PreDiabetes).unwrap(), "\"Pre-diabetes\"");
    }
}
