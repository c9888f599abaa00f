//! Reference ranges used to label predicted biomarker values.
//!
//! Units follow the training data: Ferritin ng/mL, B12 pg/mL, CRP mg/L,
//! Cystatin C mg/L, HbA1c %, AFP ng/mL.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
#[error("reference range {name} must satisfy {low} < {high}")]
pub struct RangeError {
    pub name: &'static str,
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LowHigh {
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FerritinRanges {
    pub male: LowHigh,
    pub female: LowHigh,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hba1cRanges {
    /// Values below this are normal.
    pub normal: f64,
    /// Values at or above this indicate diabetes.
    pub diabetes: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AfpRanges {
    pub low: f64,
    /// Upper bound (inclusive) of the normal range.
    pub mild_high: f64,
    /// Upper bound (inclusive) of the mildly high range.
    pub clinically_high: f64,
}

/// Per-biomarker thresholds. The `low` bounds of CRP, Cystatin C and AFP are
/// informational; no category is assigned below them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeTable {
    pub ferritin: FerritinRanges,
    pub b12: LowHigh,
    pub crp: LowHigh,
    pub cystatin_c: LowHigh,
    pub hba1c: Hba1cRanges,
    pub afp: AfpRanges,
}

impl RangeTable {
    pub const STANDARD: RangeTable = RangeTable {
        ferritin: FerritinRanges {
            male:   LowHigh { low: 30.0, high: 400.0 },
            female: LowHigh { low: 15.0, high: 150.0 },
        },
        b12:        LowHigh { low: 200.0, high: 900.0 },
        crp:        LowHigh { low: 0.0,   high: 5.0 },
        cystatin_c: LowHigh { low: 0.6,   high: 1.0 },
        hba1c:      Hba1cRanges { normal: 5.7, diabetes: 6.5 },
        afp:        AfpRanges { low: 0.0, mild_high: 10.0, clinically_high: 20.0 },
    };

    /// Every range must be finite and ordered low < high.
    pub fn validate(&self) -> Result<(), RangeError> {
        let pairs = [
            ("ferritin.male", self.ferritin.male.low, self.ferritin.male.high),
            ("ferritin.female", self.ferritin.female.low, self.ferritin.female.high),
            ("b12", self.b12.low, self.b12.high),
            ("crp", self.crp.low, self.crp.high),
            ("cystatin_c", self.cystatin_c.low, self.cystatin_c.high),
            ("hba1c", self.hba1c.normal, self.hba1c.diabetes),
            ("afp.normal", self.afp.low, self.afp.mild_high),
            ("afp.mild_high", self.afp.mild_high, self.afp.clinically_high),
        ];
        for (name, low, high) in pairs {
            if !(low.is_finite() && high.is_finite() && low < high) {
                return Err(RangeError { name, low, high });
            }
        }
        Ok(())
    }
}

impl Default for RangeTable {
    fn default() -> Self {
        Self::STANDARD
    }
}
