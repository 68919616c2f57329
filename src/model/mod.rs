//! Pre-trained regression model
//!
//! The model is shipped as a JSON document:
//!
//! ```json
//! {
//!   "feature_names": ["annee_modele", "..."],
//!   "estimator": { "type": "gradient_boosting", "base_score": 95000.0,
//!                  "learning_rate": 0.1, "trees": [ ... ] }
//! }
//! ```
//!
//! Supported estimators are linear, gradient-boosted trees and random forests.

mod tree;

pub use tree::TreeNode;

use crate::error::{PricingError, Result};
use crate::features::{FEATURE_COLUMNS, N_FEATURES};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// The fitted estimator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Estimator {
    Linear {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    GradientBoosting {
        base_score: f64,
        learning_rate: f64,
        trees: Vec<TreeNode>,
    },
    RandomForest {
        trees: Vec<TreeNode>,
    },
}

impl Estimator {
    pub fn kind(&self) -> &'static str {
        match self {
            Estimator::Linear { .. } => "linear",
            Estimator::GradientBoosting { .. } => "gradient_boosting",
            Estimator::RandomForest { .. } => "random_forest",
        }
    }

    fn predict_row(&self, sample: &[f64]) -> Result<f64> {
        let tree_sum = |trees: &[TreeNode]| -> Result<f64> {
            trees.iter().try_fold(0.0, |acc, t| {
                t.predict(sample).map(|v| acc + v).ok_or_else(|| {
                    PricingError::InferenceError("tree split on a feature outside the sample".to_string())
                })
            })
        };

        match self {
            Estimator::Linear { coefficients, intercept } => {
                Ok(intercept + coefficients.iter().zip(sample).map(|(w, x)| w * x).sum::<f64>())
            }
            Estimator::GradientBoosting { base_score, learning_rate, trees } => {
                Ok(base_score + learning_rate * tree_sum(trees)?)
            }
            Estimator::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err(PricingError::ModelError("model has no trees".to_string()));
                }
                Ok(tree_sum(trees)? / trees.len() as f64)
            }
        }
    }
}

/// A loaded, validated regression model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    feature_names: Option<Vec<String>>,
    estimator: Estimator,
}

impl RegressionModel {
    pub fn new(estimator: Estimator) -> Result<Self> {
        let model = Self { feature_names: None, estimator };
        model.validate()?;
        Ok(model)
    }

    /// Load a model document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| PricingError::ArtifactError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let model = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            kind = model.kind(),
            n_trees = model.n_trees(),
            "Regression model loaded"
        );
        Ok(model)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    pub fn kind(&self) -> &'static str {
        self.estimator.kind()
    }

    pub fn n_features(&self) -> usize {
        N_FEATURES
    }

    pub fn n_trees(&self) -> usize {
        match &self.estimator {
            Estimator::Linear { .. } => 0,
            Estimator::GradientBoosting { trees, .. } | Estimator::RandomForest { trees } => trees.len(),
        }
    }

    /// Depth of the deepest tree; 0 for linear models.
    pub fn max_depth(&self) -> usize {
        match &self.estimator {
            Estimator::Linear { .. } => 0,
            Estimator::GradientBoosting { trees, .. } | Estimator::RandomForest { trees } => {
                trees.iter().map(TreeNode::depth).max().unwrap_or(0)
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if let Some(names) = &self.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_COLUMNS.iter().copied()) {
                return Err(PricingError::SchemaMismatch {
                    expected: FEATURE_COLUMNS.join(", "),
                    actual: names.join(", "),
                });
            }
        }

        match &self.estimator {
            Estimator::Linear { coefficients, .. } => {
                if coefficients.len() != N_FEATURES {
                    return Err(PricingError::ModelError(format!(
                        "expected {} coefficients, got {}",
                        N_FEATURES,
                        coefficients.len()
                    )));
                }
            }
            Estimator::GradientBoosting { trees, .. } | Estimator::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err(PricingError::ModelError("model has no trees".to_string()));
                }
                if let Some(max) = trees.iter().filter_map(TreeNode::max_feature).max() {
                    if max >= N_FEATURES {
                        return Err(PricingError::ModelError(format!(
                            "split on feature {} but only {} features exist",
                            max, N_FEATURES
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Predict a single encoded row.
    pub fn predict(&self, sample: &[f64]) -> Result<f64> {
        if sample.len() != N_FEATURES {
            return Err(PricingError::InferenceError(format!(
                "expected {} features, got {}",
                N_FEATURES,
                sample.len()
            )));
        }
        self.estimator.predict_row(sample)
    }

    /// Predict every row of an `(n, N_FEATURES)` matrix.
    pub fn predict_batch(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if x.ncols() != N_FEATURES {
            return Err(PricingError::InferenceError(format!(
                "expected {} feature columns, got {}",
                N_FEATURES,
                x.ncols()
            )));
        }
        x.rows()
            .into_iter()
            .map(|row| self.estimator.predict_row(&row.to_vec()))
            .collect::<Result<Vec<f64>>>()
            .map(Array1::from_vec)
    }

    /// Per-feature importance, normalized to sum to 1.
    ///
    /// Trees use split counts; linear models use absolute coefficients.
    pub fn feature_importances(&self) -> Vec<(&'static str, f64)> {
        let mut weights = vec![0.0f64; N_FEATURES];
        match &self.estimator {
            Estimator::Linear { coefficients, .. } => {
                for (w, c) in weights.iter_mut().zip(coefficients) {
                    *w = c.abs();
                }
            }
            Estimator::GradientBoosting { trees, .. } | Estimator::RandomForest { trees } => {
                for tree in trees {
                    tree.count_splits(&mut weights);
                }
            }
        }

        let total: f64 = weights.iter().sum();
        if total > 0.0 {
            for w in weights.iter_mut() {
                *w /= total;
            }
        }
        FEATURE_COLUMNS.iter().copied().zip(weights).collect()
    }
}
