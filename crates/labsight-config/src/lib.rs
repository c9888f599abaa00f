//! Configuration loading for Labsight.
//! Reads labsight.toml from the current directory or path in LABSIGHT_CONFIG env var.

use labsight_common::{LabsightError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "LABSIGHT_CONFIG";
pub const BIND_ENV: &str = "LABSIGHT_BIND";
pub const MODEL_DIR_ENV: &str = "LABSIGHT_MODEL_DIR";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub features: FeatureConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String { "0.0.0.0:5000".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Directory holding the `<biomarker>_model.json` artifacts.
    #[serde(default = "default_model_dir")]
    pub dir: PathBuf,
}

fn default_model_dir() -> PathBuf { PathBuf::from("models") }

impl Default for ModelsConfig {
    fn default() -> Self {
        Self { dir: default_model_dir() }
    }
}

/// How string-valued features are turned into model inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    #[serde(default = "default_male_code")]
    pub sex_male_code: f64,
    #[serde(default = "default_female_code")]
    pub sex_female_code: f64,
}

fn default_male_code()   -> f64 { 1.0 }
fn default_female_code() -> f64 { 0.0 }

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            sex_male_code: default_male_code(),
            sex_female_code: default_female_code(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, used when RUST_LOG is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String { "labsight=debug,info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_log_filter() }
    }
}

mod tests;

impl Config {
    /// Load configuration from labsight.toml.
    /// Checks LABSIGHT_CONFIG env var first, then current directory.
    pub fn load() -> Result<Self> {
        Self::load_from(Self::path_from_env())
    }

    pub fn path_from_env() -> PathBuf {
        std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("labsight.toml"))
    }

    /// Load from `path`, then apply env overrides and validate.
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::from_path(path)?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply LABSIGHT_BIND / LABSIGHT_MODEL_DIR style overrides.
    /// `lookup` is `std::env::var` in production.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup(BIND_ENV).filter(|v| !v.is_empty()) {
            self.server.bind = bind;
        }
        if let Some(dir) = lookup(MODEL_DIR_ENV).filter(|v| !v.is_empty()) {
            self.models.dir = PathBuf::from(dir);
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;
        if !self.features.sex_male_code.is_finite() || !self.features.sex_female_code.is_finite() {
            return Err(LabsightError::Config(
                "features.sex_male_code and features.sex_female_code must be finite".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server.bind.parse().map_err(|e| {
            LabsightError::Config(format!("invalid server.bind '{}': {}", self.server.bind, e))
        })
    }
}
