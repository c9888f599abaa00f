//! A single patient's lab measurements as submitted to `/predict`.

use labsight_common::Sex;
use serde_json::{Map, Value};
use thiserror::Error;

/// Name of the feature carrying the patient's sex.
pub const SEX_FEATURE: &str = "sex";

/// Request-level problems with the submitted body.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("No input data provided")]
    Empty,

    #[error("Malformed request body: {0}")]
    Malformed(String),
}

/// A feature was present but could not be turned into a model input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EncodingError {
    #[error("feature '{feature}' is {found}, expected a number")]
    NotNumeric { feature: String, found: &'static str },
}

/// Numeric codes for string-valued features.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureEncoding {
    pub sex_male_code: f64,
    pub sex_female_code: f64,
}

impl Default for FeatureEncoding {
    fn default() -> Self {
        Self { sex_male_code: 1.0, sex_female_code: 0.0 }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Debug, Clone, Default)]
pub struct PatientRecord {
    values: Map<String, Value>,
}

impl PatientRecord {
    /// Parse a raw request body. An empty body or a falsy JSON value (`null`,
    /// `false`, `0`, `""`, `{}`, `[]`) means no input; anything else that is
    /// not a JSON object is malformed.
    pub fn from_slice(body: &[u8]) -> Result<Self, RecordError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(RecordError::Empty);
        }
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| RecordError::Malformed(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        match value {
            Value::Object(values) if values.is_empty() => Err(RecordError::Empty),
            Value::Object(values) => Ok(Self { values }),
            Value::Null | Value::Bool(false) => Err(RecordError::Empty),
            Value::Number(n) if n.as_f64() == Some(0.0) => Err(RecordError::Empty),
            Value::String(s) if s.is_empty() => Err(RecordError::Empty),
            Value::Array(items) if items.is_empty() => Err(RecordError::Empty),
            other => Err(RecordError::Malformed(format!(
                "expected a JSON object, got {}",
                json_type(&other)
            ))),
        }
    }

    pub fn contains(&self, feature: &str) -> bool {
        self.values.contains_key(feature)
    }

    pub fn get(&self, feature: &str) -> Option<&Value> {
        self.values.get(feature)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Required features absent from the record, in the order given.
    pub fn missing<'a>(&self, required: &'a [String]) -> Vec<&'a str> {
        required
            .iter()
            .map(String::as_str)
            .filter(|f| !self.contains(f))
            .collect()
    }

    /// Sex for reference-range purposes. Only string labels are interpreted;
    /// a missing or non-string value takes the female path.
    pub fn sex(&self) -> Sex {
        Sex::from_label(self.get(SEX_FEATURE).and_then(Value::as_str))
    }

    /// Build the model input in the order of `required`. Callers check
    /// [`missing`](Self::missing) first.
    pub fn feature_vector(
        &self,
        required: &[String],
        encoding: &FeatureEncoding,
    ) -> Result<Vec<f64>, EncodingError> {
        required
            .iter()
            .map(|name| match self.get(name) {
                Some(value) => encode(name, value, encoding),
                None => Err(EncodingError::NotNumeric { feature: name.clone(), found: "missing" }),
            })
            .collect()
    }
}

fn encode(name: &str, value: &Value, encoding: &FeatureEncoding) -> Result<f64, EncodingError> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| EncodingError::NotNumeric {
            feature: name.to_string(),
            found: "an unrepresentable number",
        }),
        Value::String(label) if name == SEX_FEATURE => Ok(match Sex::from_label(Some(label.as_str())) {
            Sex::Male => encoding.sex_male_code,
            Sex::Female => encoding.sex_female_code,
        }),
        other => Err(EncodingError::NotNumeric {
            feature: name.to_string(),
            found: json_type(other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(features: &[&str]) -> Vec<String> {
        features.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(PatientRecord::from_slice(b"").unwrap_err(), RecordError::Empty);
        assert_eq!(PatientRecord::from_slice(b"  \n").unwrap_err(), RecordError::Empty);
        assert_eq!(PatientRecord::from_slice(b"{}").unwrap_err(), RecordError::Empty);
        assert_eq!(PatientRecord::from_slice(b"null").unwrap_err(), RecordError::Empty);
        assert_eq!(PatientRecord::from_slice(b"[]").unwrap_err(), RecordError::Empty);
        assert_eq!(PatientRecord::from_slice(b"0").unwrap_err(), RecordError::Empty);
        assert_eq!(PatientRecord::from_slice(b"0.0").unwrap_err(), RecordError::Empty);
        assert_eq!(PatientRecord::from_slice(b"false").unwrap_err(), RecordError::Empty);
        assert_eq!(PatientRecord::from_slice(b"\"\"").unwrap_err(), RecordError::Empty);
    }

    #[test]
    fn test_malformed_inputs() {
        assert!(matches!(PatientRecord::from_slice(b"{\"age\": "), Err(RecordError::Malformed(_))));
        assert!(matches!(PatientRecord::from_slice(b"[1, 2]"), Err(RecordError::Malformed(_))));
        assert!(matches!(PatientRecord::from_slice(b"true"), Err(RecordError::Malformed(_))));
        assert!(matches!(PatientRecord::from_slice(b"\"age\""), Err(RecordError::Malformed(_))));
        let err = PatientRecord::from_slice(b"42").unwrap_err();
        assert_eq!(err.to_string(), "Malformed request body: expected a JSON object, got a number");
    }

    #[test]
    fn test_missing_preserves_declared_order() {
        let record = PatientRecord::from_value(json!({"alt": 20, "wbc": 6.1})).unwrap();
        let required = names(&["wbc", "neutrophils", "alt", "albumin"]);
        assert_eq!(record.missing(&required), vec!["neutrophils", "albumin"]);
    }

    #[test]
    fn test_null_counts_as_present() {
        let record = PatientRecord::from_value(json!({"albumin": null})).unwrap();
        assert!(record.missing(&names(&["albumin"])).is_empty());
        let err = record.feature_vector(&names(&["albumin"]), &FeatureEncoding::default()).unwrap_err();
        assert_eq!(err.to_string(), "feature 'albumin' is null, expected a number");
    }

    #[test]
    fn test_feature_vector_order_and_sex_encoding() {
        let record = PatientRecord::from_value(json!({
            "hb": 13.5, "age": 54, "sex": "male", "urea": 5
        }))
        .unwrap();
        let encoding = FeatureEncoding { sex_male_code: 1.0, sex_female_code: 0.0 };
        let x = record.feature_vector(&names(&["age", "sex", "hb", "urea"]), &encoding).unwrap();
        assert_eq!(x, vec![54.0, 1.0, 13.5, 5.0]);
    }

    #[test]
    fn test_numeric_sex_passes_through() {
        let record = PatientRecord::from_value(json!({"sex": 0})).unwrap();
        let x = record.feature_vector(&names(&["sex"]), &FeatureEncoding::default()).unwrap();
        assert_eq!(x, vec![0.0]);
        // Numeric sex is not a label, so the ranges take the female path
        assert_eq!(record.sex(), Sex::Female);
    }

    #[test]
    fn test_string_in_numeric_feature_rejected() {
        let record = PatientRecord::from_value(json!({"age": "fifty"})).unwrap();
        let err = record.feature_vector(&names(&["age"]), &FeatureEncoding::default()).unwrap_err();
        assert!(matches!(err, EncodingError::NotNumeric { found: "a string", .. }));
    }

    #[test]
    fn test_sex_lookup() {
        let male = PatientRecord::from_value(json!({"sex": "m"})).unwrap();
        let unknown = PatientRecord::from_value(json!({"sex": "unknown"})).unwrap();
        let absent = PatientRecord::from_value(json!({"age": 40})).unwrap();
        assert_eq!(male.sex(), Sex::Male);
        assert_eq!(unknown.sex(), Sex::Female);
        assert_eq!(absent.sex(), Sex::Female);
    }
}
