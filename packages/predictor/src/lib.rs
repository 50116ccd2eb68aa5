#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Prediction over pre-trained Rescue Radar models.
//!
//! Model artifacts are loaded once at process start and are read-only
//! afterwards, so a single predictor can be shared across every request
//! handler behind an `Arc<dyn Predictor>`.
//!
//! - [`FloodPredictor`]: three indicators in, disaster score out.
//! - [`TsunamiPredictor`]: magnitude, depth, latitude and longitude in,
//!   tsunami probability out. Inputs go through a fitted scaler first.

pub mod artifact;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::artifact::{Artifact, LinearModel, LogisticModel, StandardScaler, load_artifact};

/// Number of indicators the flood model takes.
pub const FLOOD_FEATURES: usize = 3;

/// Number of seismic readings the tsunami model takes.
pub const TSUNAMI_FEATURES: usize = 4;

/// Errors raised while loading model artifacts.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The artifact file could not be read.
    #[error("Failed to read artifact {path}: {source}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The artifact is not valid JSON or has an unknown shape.
    #[error("Failed to parse artifact: {0}")]
    Parse(#[from] serde_json::Error),

    /// The artifact parsed but is unusable.
    #[error("Invalid artifact: {message}")]
    Invalid {
        /// Description of the problem.
        message: String,
    },

    /// The artifact is of a different kind than expected.
    #[error("Expected a {expected} artifact at {path}, found {found}")]
    WrongKind {
        /// Artifact kind required.
        expected: &'static str,
        /// Artifact kind found.
        found: &'static str,
        /// Path the artifact came from.
        path: PathBuf,
    },
}

/// Errors raised while running a prediction.
#[derive(Debug, Error, PartialEq)]
pub enum PredictError {
    /// Feature vector has the wrong length.
    #[error("Expected {expected} features, got {actual}")]
    Arity {
        /// Feature count the model was trained on.
        expected: usize,
        /// Feature count supplied.
        actual: usize,
    },

    /// A feature is `NaN` or infinite.
    #[error("Feature {index} is not a finite number")]
    NonFiniteInput {
        /// Position of the offending feature.
        index: usize,
    },

    /// The model produced `NaN` or an infinity.
    #[error("Model produced a non-finite output")]
    NonFiniteOutput,
}

/// A loaded model that turns a fixed-size feature vector into a score.
///
/// Implementations must be free of interior mutability so the same input
/// always yields the same output.
pub trait Predictor: Send + Sync {
    /// Number of features [`Predictor::predict`] expects.
    fn arity(&self) -> usize;

    /// Runs the model.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError`] if the features have the wrong arity or
    /// are not finite, or if the model output is not finite.
    fn predict(&self, features: &[f64]) -> Result<f64, PredictError>;
}

/// Disaster score regression over three flood indicators.
#[derive(Debug, Clone)]
pub struct FloodPredictor {
    model: LinearModel,
}

impl FloodPredictor {
    /// Wraps an already-loaded model.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Invalid`] if the model does not take exactly
    /// [`FLOOD_FEATURES`] features.
    pub fn new(model: LinearModel) -> Result<Self, ModelError> {
        expect_features("flood model", model.coefficients.len(), FLOOD_FEATURES)?;
        Ok(Self { model })
    }

    /// Loads the flood model from a `linear_regression` artifact.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if the artifact is missing, malformed, of the
    /// wrong kind, or has the wrong number of features.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        match load_artifact(path)? {
            Artifact::LinearRegression(model) => Self::new(model),
            other => Err(wrong_kind("linear_regression", &other, path)),
        }
    }
}

impl Predictor for FloodPredictor {
    fn arity(&self) -> usize {
        FLOOD_FEATURES
    }

    fn predict(&self, features: &[f64]) -> Result<f64, PredictError> {
        check_input(features, FLOOD_FEATURES)?;
        let score = self.model.predict(features)?;
        log::debug!("Flood model input {features:?} -> {score}");
        finite(score)
    }
}

/// Tsunami probability from standardised seismic readings.
///
/// Feature order is magnitude, depth, latitude, longitude.
#[derive(Debug, Clone)]
pub struct TsunamiPredictor {
    scaler: StandardScaler,
    model: LogisticModel,
}

impl TsunamiPredictor {
    /// Pairs a scaler with a model.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Invalid`] if either artifact does not take
    /// exactly [`TSUNAMI_FEATURES`] features.
    pub fn new(scaler: StandardScaler, model: LogisticModel) -> Result<Self, ModelError> {
        expect_features("tsunami scaler", scaler.mean.len(), TSUNAMI_FEATURES)?;
        expect_features("tsunami model", model.coefficients.len(), TSUNAMI_FEATURES)?;
        Ok(Self { scaler, model })
    }

    /// Loads a `standard_scaler` and `logistic_regression` artifact pair.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if either artifact is missing, malformed, of
    /// the wrong kind, or the pair disagrees on the feature count.
    pub fn load(scaler_path: &Path, model_path: &Path) -> Result<Self, ModelError> {
        let scaler = match load_artifact(scaler_path)? {
            Artifact::StandardScaler(scaler) => scaler,
            other => return Err(wrong_kind("standard_scaler", &other, scaler_path)),
        };
        let model = match load_artifact(model_path)? {
            Artifact::LogisticRegression(model) => model,
            other => return Err(wrong_kind("logistic_regression", &other, model_path)),
        };
        Self::new(scaler, model)
    }
}

impl Predictor for TsunamiPredictor {
    fn arity(&self) -> usize {
        TSUNAMI_FEATURES
    }

    fn predict(&self, features: &[f64]) -> Result<f64, PredictError> {
        check_input(features, TSUNAMI_FEATURES)?;
        let scaled = self.scaler.transform(features)?;
        let probability = self.model.predict_proba(&scaled)?;
        log::debug!("Tsunami model input {features:?} (scaled {scaled:?}) -> {probability}");
        finite(probability)
    }
}

fn expect_features(what: &str, actual: usize, expected: usize) -> Result<(), ModelError> {
    if actual == expected {
        Ok(())
    } else {
        Err(ModelError::Invalid {
            message: format!("{what} takes {actual} features, expected {expected}"),
        })
    }
}

fn wrong_kind(expected: &'static str, found: &Artifact, path: &Path) -> ModelError {
    ModelError::WrongKind {
        expected,
        found: found.kind(),
        path: path.to_path_buf(),
    }
}

fn check_input(features: &[f64], expected: usize) -> Result<(), PredictError> {
    if features.len() != expected {
        return Err(PredictError::Arity {
            expected,
            actual: features.len(),
        });
    }
    if let Some(index) = features.iter().position(|v| !v.is_finite()) {
        return Err(PredictError::NonFiniteInput { index });
    }
    Ok(())
}

const fn finite(value: f64) -> Result<f64, PredictError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PredictError::NonFiniteOutput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flood() -> FloodPredictor {
        FloodPredictor::new(LinearModel {
            coefficients: vec![1.5, 2.0, 0.5],
            intercept: 1.0,
        })
        .unwrap()
    }

    fn tsunami() -> TsunamiPredictor {
        TsunamiPredictor::new(
            StandardScaler {
                mean: vec![7.0, 50.0, 0.0, 0.0],
                scale: vec![0.5, 50.0, 30.0, 100.0],
            },
            LogisticModel {
                coefficients: vec![3.0, -1.5, 0.1, 0.1],
                intercept: -0.5,
            },
        )
        .unwrap()
    }

    #[test]
    fn flood_prediction_is_deterministic() {
        let predictor = flood();
        let first = predictor.predict(&[1.0, 1.0, 1.0]).unwrap();
        for _ in 0..100 {
            assert!((predictor.predict(&[1.0, 1.0, 1.0]).unwrap() - first).abs() < f64::EPSILON);
        }
        assert!((first - 5.0).abs() < 1e-12);
    }

    #[test]
    fn flood_rejects_wrong_arity() {
        assert_eq!(
            flood().predict(&[1.0, 2.0]),
            Err(PredictError::Arity {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn flood_rejects_non_finite_input() {
        assert_eq!(
            flood().predict(&[1.0, f64::NAN, 2.0]),
            Err(PredictError::NonFiniteInput { index: 1 })
        );
    }

    #[test]
    fn flood_requires_three_coefficients() {
        let err = FloodPredictor::new(LinearModel {
            coefficients: vec![1.0, 2.0, 3.0, 4.0],
            intercept: 0.0,
        })
        .unwrap_err();
        assert!(matches!(err, ModelError::Invalid { .. }));
    }

    #[test]
    fn tsunami_probability_tracks_magnitude() {
        let predictor = tsunami();
        let weak = predictor.predict(&[5.0, 10.0, 0.0, 0.0]).unwrap();
        let strong = predictor.predict(&[9.0, 10.0, 0.0, 0.0]).unwrap();
        assert!((0.0..=1.0).contains(&weak));
        assert!((0.0..=1.0).contains(&strong));
        assert!(strong > weak);
        assert!(strong > 0.9);
        assert!(weak < 0.1);
    }

    #[test]
    fn tsunami_rejects_mismatched_pair() {
        let err = TsunamiPredictor::new(
            StandardScaler {
                mean: vec![0.0; 3],
                scale: vec![1.0; 3],
            },
            LogisticModel {
                coefficients: vec![1.0; 4],
                intercept: 0.0,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Invalid { .. }));
    }

    #[test]
    fn load_reports_missing_artifacts() {
        let missing = Path::new("/nonexistent/rescue-radar/flood.json");
        assert!(matches!(
            FloodPredictor::load(missing),
            Err(ModelError::Io { .. })
        ));
        assert!(matches!(
            TsunamiPredictor::load(missing, missing),
            Err(ModelError::Io { .. })
        ));
    }

    fn shipped(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../data/models")
            .join(name)
    }

    #[test]
    fn shipped_flood_model_is_deterministic() {
        let predictor = FloodPredictor::load(&shipped("flood_model.json")).unwrap();
        let first = predictor.predict(&[1.0, 1.0, 1.0]).unwrap();
        let second = predictor.predict(&[1.0, 1.0, 1.0]).unwrap();
        assert!(first.is_finite());
        assert!((first - second).abs() < f64::EPSILON);
        assert!((first - 3.02).abs() < 1e-9);
    }

    #[test]
    fn shipped_tsunami_model_yields_probabilities() {
        let predictor = TsunamiPredictor::load(
            &shipped("tsunami_scaler.json"),
            &shipped("tsunami_model.json"),
        )
        .unwrap();
        assert_eq!(predictor.arity(), TSUNAMI_FEATURES);
        let weak = predictor.predict(&[5.5, 30.0, 0.0, 0.0]).unwrap();
        let strong = predictor.predict(&[8.5, 30.0, 0.0, 0.0]).unwrap();
        assert!((0.0..=1.0).contains(&weak));
        assert!((0.0..=1.0).contains(&strong));
        assert!(strong > weak);
    }

    #[test]
    fn load_rejects_wrong_artifact_kind() {
        let err = FloodPredictor::load(&shipped("tsunami_model.json")).unwrap_err();
        assert!(matches!(
            err,
            ModelError::WrongKind {
                expected: "linear_regression",
                found: "logistic_regression",
                ..
            }
        ));
        assert!(err.to_string().contains("tsunami_model.json"));

        let err = TsunamiPredictor::load(
            &shipped("tsunami_model.json"),
            &shipped("tsunami_model.json"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ModelError::WrongKind {
                expected: "standard_scaler",
                ..
            }
        ));
    }

    #[test]
    fn io_error_names_the_path() {
        let err = FloodPredictor::load(Path::new("/nonexistent/rescue-radar/flood.json")).unwrap_err();
        assert!(
            err.to_string()
                .starts_with("Failed to read artifact /nonexistent/rescue-radar/flood.json")
        );
    }

    #[test]
    fn predictors_share_across_threads() {
        let predictor: std::sync::Arc<dyn Predictor> = std::sync::Arc::new(flood());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let predictor = predictor.clone();
                std::thread::spawn(move || predictor.predict(&[2.0, 1.0, 0.0]).unwrap())
            })
            .collect();
        for handle in handles {
            assert!((handle.join().unwrap() - 6.0).abs() < 1e-12);
        }
    }
}
