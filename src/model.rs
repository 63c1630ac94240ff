//! Scaler and classifier boundary
//!
//! The trained scaler and classifier are treated as opaque services behind
//! the [`Scaler`] and [`Classifier`] traits. [`ModelBundle`] provides JSON
//! loadable implementations (standardization plus a linear multi-class model)
//! exported from the training environment.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::encoding::STRESS_LABELS;
use crate::error::{InferenceError, PredictError};
use crate::types::FEATURE_COUNT;

/// Feature normalization fitted at training time
pub trait Scaler: Send + Sync {
    /// Normalize a single row of features
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError>;
}

/// Trained classifier over normalized features
pub trait Classifier: Send + Sync {
    /// Predict the class index of a single normalized row
    fn predict(&self, row: &[f64]) -> Result<usize, InferenceError>;
}

/// Per-column standardization: `(x - mean) / scale`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    fn check(&self) -> Result<(), InferenceError> {
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            return Err(InferenceError::InvalidModel(format!(
                "scaler must have {} means and scales, got {} and {}",
                FEATURE_COUNT,
                self.mean.len(),
                self.scale.len()
            )));
        }
        if self.mean.iter().chain(&self.scale).any(|v| !v.is_finite()) {
            return Err(InferenceError::InvalidModel(
                "scaler parameters must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

impl Scaler for StandardScaler {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
        if row.len() != self.mean.len() {
            return Err(InferenceError::ShapeMismatch {
                stage: "scaler",
                expected: self.mean.len(),
                actual: row.len(),
            });
        }

        row.iter()
            .zip(self.mean.iter().zip(&self.scale))
            .enumerate()
            .map(|(column, (x, (mean, scale)))| {
                // Constant columns were fitted with zero variance; leave them centered
                let value = if *scale == 0.0 {
                    x - mean
                } else {
                    (x - mean) / scale
                };
                if value.is_finite() {
                    Ok(value)
                } else {
                    Err(InferenceError::NonFiniteOutput {
                        stage: "scaler",
                        column,
                    })
                }
            })
            .collect()
    }
}

/// Linear multi-class model; predicts the argmax of `W·x + b`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    /// One row of weights per class
    pub coefficients: Vec<Vec<f64>>,
    /// One intercept per class
    pub intercepts: Vec<f64>,
}

impl LinearClassifier {
    fn check(&self) -> Result<(), InferenceError> {
        let classes = STRESS_LABELS.len();
        if self.coefficients.len() != classes || self.intercepts.len() != classes {
            return Err(InferenceError::InvalidModel(format!(
                "classifier must have {} classes, got {} coefficient rows and {} intercepts",
                classes,
                self.coefficients.len(),
                self.intercepts.len()
            )));
        }
        if let Some(row) = self.coefficients.iter().find(|r| r.len() != FEATURE_COUNT) {
            return Err(InferenceError::InvalidModel(format!(
                "coefficient rows must have {} weights, got {}",
                FEATURE_COUNT,
                row.len()
            )));
        }
        Ok(())
    }

    /// Decision score of each class for a row
    pub fn decision_function(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
        self.coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(weights, intercept)| {
                if weights.len() != row.len() {
                    return Err(InferenceError::ShapeMismatch {
                        stage: "classifier",
                        expected: weights.len(),
                        actual: row.len(),
                    });
                }
                Ok(weights.iter().zip(row).map(|(w, x)| w * x).sum::<f64>() + intercept)
            })
            .collect()
    }
}

impl Classifier for LinearClassifier {
    fn predict(&self, row: &[f64]) -> Result<usize, InferenceError> {
        let scores = self.decision_function(row)?;

        let mut best: Option<(usize, f64)> = None;
        for (class, score) in scores.into_iter().enumerate() {
            if !score.is_finite() {
                return Err(InferenceError::NonFiniteOutput {
                    stage: "classifier",
                    column: class,
                });
            }
            // Strict comparison keeps the lowest index on ties
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((class, score));
            }
        }

        best.map(|(class, _)| class)
            .ok_or_else(|| InferenceError::InvalidModel("classifier has no classes".to_string()))
    }
}

/// Scaler and classifier exported together from training
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBundle {
    pub scaler: StandardScaler,
    pub classifier: LinearClassifier,
}

impl ModelBundle {
    /// Parse and validate a bundle from JSON
    pub fn from_json(json: &str) -> Result<Self, PredictError> {
        let bundle: ModelBundle = serde_json::from_str(json)?;
        bundle.scaler.check()?;
        bundle.classifier.check()?;
        Ok(bundle)
    }

    /// Load a bundle from a JSON file
    pub fn load(path: &Path) -> Result<Self, PredictError> {
        let json = fs::read_to_string(path)?;
        let bundle = Self::from_json(&json)?;
        info!(path = %path.display(), "loaded model bundle");
        Ok(bundle)
    }

    /// Serialize the bundle to pretty JSON
    pub fn to_json(&self) -> Result<String, PredictError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
