//! Serialized model artifacts.
//!
//! Artifacts are JSON documents tagged by `type`:
//!
//! ```json
//! { "type": "linear_regression", "coefficients": [0.9, 1.1, 0.7], "intercept": 1.2 }
//! { "type": "logistic_regression", "coefficients": [2.1, -1.3, 0.2, 0.4], "intercept": -0.5 }
//! { "type": "standard_scaler", "mean": [6.9, 40.0, 0.0, 0.0], "scale": [0.5, 60.0, 30.0, 100.0] }
//! ```
//!
//! The coefficient layout follows scikit-learn's `coef_` / `intercept_`
//! and `mean_` / `scale_` attributes so exported models load unchanged.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ModelError, PredictError};

/// A serialized artifact loaded from disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Artifact {
    /// Ordinary least-squares regression.
    LinearRegression(LinearModel),
    /// Binary logistic regression.
    LogisticRegression(LogisticModel),
    /// Per-feature standardisation.
    StandardScaler(StandardScaler),
}

impl Artifact {
    /// Parses an artifact from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Parse`] if the JSON is malformed, and
    /// [`ModelError::Invalid`] if the parsed artifact is inconsistent.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let artifact: Self = serde_json::from_str(json)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Short name of the artifact kind, for error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::LinearRegression(_) => "linear_regression",
            Self::LogisticRegression(_) => "logistic_regression",
            Self::StandardScaler(_) => "standard_scaler",
        }
    }

    /// Number of input features the artifact expects.
    #[must_use]
    pub fn n_features(&self) -> usize {
        match self {
            Self::LinearRegression(m) => m.coefficients.len(),
            Self::LogisticRegression(m) => m.coefficients.len(),
            Self::StandardScaler(s) => s.mean.len(),
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        let values: Box<dyn Iterator<Item = &f64>> = match self {
            Self::LinearRegression(m) => Box::new(
                m.coefficients.iter().chain(std::iter::once(&m.intercept)),
            ),
            Self::LogisticRegression(m) => Box::new(
                m.coefficients.iter().chain(std::iter::once(&m.intercept)),
            ),
            Self::StandardScaler(s) => {
                if s.mean.len() != s.scale.len() {
                    return Err(ModelError::Invalid {
                        message: format!(
                            "scaler has {} means but {} scales",
                            s.mean.len(),
                            s.scale.len()
                        ),
                    });
                }
                Box::new(s.mean.iter().chain(s.scale.iter()))
            }
        };

        if self.n_features() == 0 {
            return Err(ModelError::Invalid {
                message: format!("{} artifact has no features", self.kind()),
            });
        }

        if values.into_iter().any(|v| !v.is_finite()) {
            return Err(ModelError::Invalid {
                message: format!("{} artifact contains non-finite values", self.kind()),
            });
        }

        Ok(())
    }
}

/// Reads and parses an artifact file.
///
/// # Errors
///
/// Returns [`ModelError::Io`] if the file cannot be read, or a parse or
/// validation error from [`Artifact::from_json`].
pub fn load_artifact(path: &Path) -> Result<Artifact, ModelError> {
    let json = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let artifact = Artifact::from_json(&json)?;
    log::debug!(
        "Loaded {} artifact with {} features from {}",
        artifact.kind(),
        artifact.n_features(),
        path.display()
    );
    Ok(artifact)
}

/// Linear regression: `y = w·x + b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    /// One weight per feature.
    pub coefficients: Vec<f64>,
    /// Bias term.
    pub intercept: f64,
}

impl LinearModel {
    /// Evaluates the regression.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::Arity`] if `features` has the wrong length.
    pub fn predict(&self, features: &[f64]) -> Result<f64, PredictError> {
        Ok(dot(&self.coefficients, features)? + self.intercept)
    }
}

/// Logistic regression over two classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    /// One weight per feature.
    pub coefficients: Vec<f64>,
    /// Bias term.
    pub intercept: f64,
}

impl LogisticModel {
    /// Probability of the positive class, `sigmoid(w·x + b)`.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::Arity`] if `features` has the wrong length.
    pub fn predict_proba(&self, features: &[f64]) -> Result<f64, PredictError> {
        let z = dot(&self.coefficients, features)? + self.intercept;
        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

/// Standardises features to zero mean and unit variance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Per-feature mean seen during fitting.
    pub mean: Vec<f64>,
    /// Per-feature standard deviation seen during fitting.
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Returns `(x - mean) / scale` for each feature.
    ///
    /// A (near) zero scale is treated as 1, matching what scikit-learn
    /// stores for constant features.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::Arity`] if `features` has the wrong length.
    pub fn transform(&self, features: &[f64]) -> Result<Vec<f64>, PredictError> {
        if features.len() != self.mean.len() {
            return Err(PredictError::Arity {
                expected: self.mean.len(),
                actual: features.len(),
            });
        }

        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                let scale = if scale.abs() < 10.0 * f64::EPSILON { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect())
    }
}

fn dot(weights: &[f64], features: &[f64]) -> Result<f64, PredictError> {
    if weights.len() != features.len() {
        return Err(PredictError::Arity {
            expected: weights.len(),
            actual: features.len(),
        });
    }
    Ok(weights.iter().zip(features).map(|(w, x)| w * x).sum())
}
