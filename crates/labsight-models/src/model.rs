//! Regression model inference.
//!
//! - Linear: f(x) = b + Σ wᵢ·x'ᵢ, where x'ᵢ = (xᵢ - μᵢ) / σᵢ when a scaler is present
//! - Tree ensemble: b + η·Σ tree(x) (boosting) or b + mean(tree(x)) (bagging)

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A fitted model that maps an ordered feature vector to one scalar.
pub trait RegressionModel: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError>;

    /// Number of features the model consumes.
    fn n_features(&self) -> usize;

    /// Short name of the model family, e.g. "linear".
    fn kind(&self) -> &'static str;
}

fn check_len(expected: usize, features: &[f64]) -> Result<(), ModelError> {
    if features.len() != expected {
        return Err(ModelError::FeatureCount { expected, actual: features.len() });
    }
    Ok(())
}

fn check_finite(value: f64) -> Result<f64, ModelError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ModelError::NonFinite(value))
    }
}

// ── Linear ───────────────────────────────────────────────────────────────────

/// Standard scaler parameters exported alongside a linear model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    #[serde(default)]
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    #[serde(default)]
    pub scaler: Option<Scaler>,
}

impl LinearModel {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self { intercept, coefficients, scaler: None }
    }

    pub fn with_scaler(mut self, mean: Vec<f64>, scale: Vec<f64>) -> Self {
        self.scaler = Some(Scaler { mean, scale });
        self
    }

    /// Check the parameters against the number of declared features.
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.coefficients.len() != n_features {
            return Err(format!(
                "linear model has {} coefficients for {} features",
                self.coefficients.len(),
                n_features
            ));
        }
        if self.coefficients.iter().any(|c| !c.is_finite()) || !self.intercept.is_finite() {
            return Err("linear model parameters must be finite".to_string());
        }
        if let Some(scaler) = &self.scaler {
            if scaler.mean.len() != n_features || scaler.scale.len() != n_features {
                return Err(format!(
                    "scaler has {} means and {} scales for {} features",
                    scaler.mean.len(),
                    scaler.scale.len(),
                    n_features
                ));
            }
            if scaler.scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
                return Err("scaler scales must be finite and non-zero".to_string());
            }
        }
        Ok(())
    }
}

impl RegressionModel for LinearModel {
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        check_len(self.coefficients.len(), features)?;

        let dot: f64 = match &self.scaler {
            Some(scaler) => features
                .iter()
                .zip(&self.coefficients)
                .zip(scaler.mean.iter().zip(&scaler.scale))
                .map(|((x, w), (mu, sigma))| w * (x - mu) / sigma)
                .sum(),
            None => features.iter().zip(&self.coefficients).map(|(x, w)| w * x).sum(),
        };

        check_finite(self.intercept + dot)
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn kind(&self) -> &'static str {
        "linear"
    }
}

// ── Tree ensemble ────────────────────────────────────────────────────────────

/// One node of a flattened regression tree. Leaves have no `feature`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(default)]
    pub feature: Option<usize>,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub left: Option<usize>,
    #[serde(default)]
    pub right: Option<usize>,
    #[serde(default)]
    pub value: f64,
}

impl TreeNode {
    pub fn leaf(value: f64) -> Self {
        Self { feature: None, threshold: 0.0, left: None, right: None, value }
    }

    pub fn split(feature: usize, threshold: f64, left: usize, right: usize) -> Self {
        Self { feature: Some(feature), threshold, left: Some(left), right: Some(right), value: 0.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    /// Walk from the root; a sample goes left when `x[feature] <= threshold`.
    /// A well-formed tree reaches a leaf in fewer than `nodes.len()` steps.
    fn evaluate(&self, features: &[f64]) -> Result<f64, ModelError> {
        let mut idx = 0;
        for _ in 0..self.nodes.len() {
            let node = self.nodes.get(idx).ok_or_else(|| {
                ModelError::InvalidTree(format!("child index {} out of range", idx))
            })?;
            match (node.feature, node.left, node.right) {
                (Some(f), Some(l), Some(r)) => {
                    let x = features.get(f).ok_or_else(|| {
                        ModelError::InvalidTree(format!("node {} splits on missing feature {}", idx, f))
                    })?;
                    idx = if *x <= node.threshold { l } else { r };
                }
                _ => return Ok(node.value),
            }
        }
        Err(ModelError::InvalidTree("walk did not reach a leaf".to_string()))
    }

    fn validate(&self, tree_idx: usize, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err(format!("tree {} has no nodes", tree_idx));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            let Some(f) = node.feature else { continue };
            if f >= n_features {
                return Err(format!(
                    "tree {} node {} splits on feature {} but only {} features exist",
                    tree_idx, i, f, n_features
                ));
            }
            for child in [node.left, node.right] {
                match child {
                    Some(c) if c > i && c < self.nodes.len() => {}
                    _ => {
                        return Err(format!(
                            "tree {} node {} has an invalid child index",
                            tree_idx, i
                        ))
                    }
                }
            }
            if !node.threshold.is_finite() {
                return Err(format!("tree {} node {} has a non-finite threshold", tree_idx, i));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Gradient boosting: trees are summed and scaled by the learning rate.
    #[default]
    Sum,
    /// Random forest: trees are averaged.
    Mean,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub n_features: usize,
    #[serde(default)]
    pub base_score: f64,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default)]
    pub aggregation: Aggregation,
    pub trees: Vec<Tree>,
}

fn default_learning_rate() -> f64 { 1.0 }

impl TreeEnsemble {
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.n_features != n_features {
            return Err(format!(
                "tree ensemble was fitted on {} features, artifact declares {}",
                self.n_features, n_features
            ));
        }
        if self.trees.is_empty() {
            return Err("tree ensemble has no trees".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(i, n_features)?;
        }
        Ok(())
    }
}

impl RegressionModel for TreeEnsemble {
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        check_len(self.n_features, features)?;

        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.evaluate(features)?;
        }
        let value = match self.aggregation {
            Aggregation::Sum => self.base_score + self.learning_rate * total,
            Aggregation::Mean => self.base_score + total / self.trees.len() as f64,
        };

        check_finite(value)
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn kind(&self) -> &'static str {
        "tree_ensemble"
    }
}

// ── Artifact-level dispatch ──────────────────────────────────────────────────

/// Model section of an artifact, tagged by `"type"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelDef {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

impl ModelDef {
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        match self {
            ModelDef::Linear(m) => m.validate(n_features),
            ModelDef::TreeEnsemble(m) => m.validate(n_features),
        }
    }
}

impl RegressionModel for ModelDef {
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        match self {
            ModelDef::Linear(m) => m.predict(features),
            ModelDef::TreeEnsemble(m) => m.predict(features),
        }
    }

    fn n_features(&self) -> usize {
        match self {
            ModelDef::Linear(m) => m.n_features(),
            ModelDef::TreeEnsemble(m) => m.n_features(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ModelDef::Linear(m) => m.kind(),
            ModelDef::TreeEnsemble(m) => m.kind(),
        }
    }
}
