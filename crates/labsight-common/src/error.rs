use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LabsightError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model artifact {path}: {reason}")]
    Artifact { path: PathBuf, reason: String },

    #[error("Model registry error: {0}")]
    Registry(String),

    #[error("Unknown biomarker: {0}")]
    UnknownBiomarker(String),
}

impl LabsightError {
    pub fn artifact(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        LabsightError::Artifact { path: path.into(), reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, LabsightError>;
