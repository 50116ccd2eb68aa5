#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Form, query and response types for the Rescue Radar servers.
//!
//! Incoming form and query fields are deserialized as optional strings and
//! then parsed explicitly, so a missing or non-numeric field becomes a
//! [`FieldError`] the handler can route to the error page instead of an
//! extractor rejection.
//!
//! Prediction results travel between the prediction and map endpoints only
//! as redirect query parameters; [`FloodResult`] and [`TsunamiResult`]
//! build and parse those parameters.

pub mod query;

use std::str::FromStr;

use rescue_radar_severity_models::{FloodSeverity, TsunamiSeverity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A form or query field that could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Field absent or blank.
    #[error("Missing field '{field}'")]
    Missing {
        /// Field name.
        field: &'static str,
    },

    /// Field present but not a finite number.
    #[error("Field '{field}' is not a number: '{value}'")]
    NotNumeric {
        /// Field name.
        field: &'static str,
        /// Raw value received.
        value: String,
    },

    /// Field is a number outside its allowed range.
    #[error("Field '{field}' is out of range: {value}")]
    OutOfRange {
        /// Field name.
        field: &'static str,
        /// Parsed value.
        value: String,
    },

    /// Field is not one of the known labels.
    #[error("Field '{field}' has unknown value '{value}'")]
    Unknown {
        /// Field name.
        field: &'static str,
        /// Raw value received.
        value: String,
    },

    /// Severity label does not match the score it was sent with.
    #[error("Field '{field}' is '{value}' but the score maps to '{expected}'")]
    Inconsistent {
        /// Field name.
        field: &'static str,
        /// Label received.
        value: String,
        /// Label the score classifies to.
        expected: String,
    },
}

fn required<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, FieldError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(FieldError::Missing { field })
}

fn number(field: &'static str, value: Option<&str>) -> Result<f64, FieldError> {
    let raw = required(field, value)?;
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FieldError::NotNumeric {
            field,
            value: raw.to_string(),
        })
}

fn in_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64, FieldError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(FieldError::OutOfRange {
            field,
            value: value.to_string(),
        })
    }
}

fn consistent<T: Copy + PartialEq + ToString>(
    field: &'static str,
    value: T,
    expected: T,
) -> Result<T, FieldError> {
    if value == expected {
        Ok(value)
    } else {
        Err(FieldError::Inconsistent {
            field,
            value: value.to_string(),
            expected: expected.to_string(),
        })
    }
}

fn label<T: FromStr>(field: &'static str, value: Option<&str>) -> Result<T, FieldError> {
    let raw = required(field, value)?;
    raw.parse().map_err(|_| FieldError::Unknown {
        field,
        value: raw.to_string(),
    })
}

// ── Flood (variant A) ───────────────────────────────────────────────

/// `POST /prediction` form body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FloodPredictionForm {
    /// Free-text place name.
    pub place: Option<String>,
    /// First indicator.
    pub a: Option<String>,
    /// Second indicator.
    pub b: Option<String>,
    /// Third indicator.
    pub c: Option<String>,
}

/// Validated flood prediction input.
#[derive(Debug, Clone, PartialEq)]
pub struct FloodInputs {
    /// Place to show on the map.
    pub place: String,
    /// Indicators in model order.
    pub features: [f64; 3],
}

impl FloodPredictionForm {
    /// Validates the form.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] for the first missing or non-numeric field.
    pub fn parse(&self) -> Result<FloodInputs, FieldError> {
        Ok(FloodInputs {
            place: required("place", self.place.as_deref())?.to_string(),
            features: [
                number("a", self.a.as_deref())?,
                number("b", self.b.as_deref())?,
                number("c", self.c.as_deref())?,
            ],
        })
    }
}

/// `GET /show_map` query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShowMapParams {
    /// Place name.
    pub place: Option<String>,
    /// Raw model score.
    pub prediction: Option<String>,
    /// Severity label.
    pub severity: Option<String>,
}

impl ShowMapParams {
    /// Validates the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] if a parameter is missing, the score is not
    /// numeric, or the severity label is unknown or disagrees with the
    /// score.
    pub fn parse(&self) -> Result<FloodResult, FieldError> {
        let place = required("place", self.place.as_deref())?.to_string();
        let prediction = number("prediction", self.prediction.as_deref())?;
        let severity = consistent(
            "severity",
            label("severity", self.severity.as_deref())?,
            FloodSeverity::from_score(prediction),
        )?;
        Ok(FloodResult {
            place,
            prediction,
            severity,
        })
    }
}

/// A flood prediction on its way to the map.
#[derive(Debug, Clone, PartialEq)]
pub struct FloodResult {
    /// Place name.
    pub place: String,
    /// Raw model score.
    pub prediction: f64,
    /// Severity band.
    pub severity: FloodSeverity,
}

impl FloodResult {
    /// Redirect target carrying this result.
    #[must_use]
    pub fn show_map_url(&self) -> String {
        query::with_query(
            "/show_map",
            &[
                ("place", self.place.clone()),
                ("prediction", self.prediction.to_string()),
                ("severity", self.severity.to_string()),
            ],
        )
    }
}

// ── Tsunami (variant B) ─────────────────────────────────────────────

/// `POST /` form body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TsunamiForm {
    /// Earthquake magnitude.
    pub magnitude: Option<String>,
    /// Hypocentre depth in km.
    pub depth: Option<String>,
    /// Epicentre latitude.
    pub latitude: Option<String>,
    /// Epicentre longitude.
    pub longitude: Option<String>,
}

/// Validated seismic readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TsunamiInputs {
    /// Earthquake magnitude.
    pub magnitude: f64,
    /// Hypocentre depth in km.
    pub depth: f64,
    /// Epicentre latitude.
    pub latitude: f64,
    /// Epicentre longitude.
    pub longitude: f64,
}

impl TsunamiInputs {
    /// Features in model order.
    #[must_use]
    pub const fn features(&self) -> [f64; 4] {
        [self.magnitude, self.depth, self.latitude, self.longitude]
    }
}

impl TsunamiForm {
    /// Validates the form.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] for the first missing, non-numeric or
    /// out-of-range field.
    pub fn parse(&self) -> Result<TsunamiInputs, FieldError> {
        parse_readings(
            self.magnitude.as_deref(),
            self.depth.as_deref(),
            self.latitude.as_deref(),
            self.longitude.as_deref(),
        )
    }
}

fn parse_readings(
    magnitude: Option<&str>,
    depth: Option<&str>,
    latitude: Option<&str>,
    longitude: Option<&str>,
) -> Result<TsunamiInputs, FieldError> {
    Ok(TsunamiInputs {
        magnitude: number("magnitude", magnitude)?,
        depth: number("depth", depth)?,
        latitude: in_range("latitude", number("latitude", latitude)?, -90.0, 90.0)?,
        longitude: in_range("longitude", number("longitude", longitude)?, -180.0, 180.0)?,
    })
}

/// `GET /result` query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultParams {
    /// Earthquake magnitude.
    pub magnitude: Option<String>,
    /// Hypocentre depth in km.
    pub depth: Option<String>,
    /// Epicentre latitude.
    pub latitude: Option<String>,
    /// Epicentre longitude.
    pub longitude: Option<String>,
    /// Model probability.
    pub tsunami_probability: Option<String>,
    /// Severity label.
    pub tsunami_severity: Option<String>,
}

impl ResultParams {
    /// Validates the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] if a parameter is missing or malformed, or
    /// the severity label disagrees with the probability.
    pub fn parse(&self) -> Result<TsunamiResult, FieldError> {
        let inputs = parse_readings(
            self.magnitude.as_deref(),
            self.depth.as_deref(),
            self.latitude.as_deref(),
            self.longitude.as_deref(),
        )?;
        let probability = in_range(
            "tsunami_probability",
            number("tsunami_probability", self.tsunami_probability.as_deref())?,
            0.0,
            1.0,
        )?;
        let severity = consistent(
            "tsunami_severity",
            label("tsunami_severity", self.tsunami_severity.as_deref())?,
            TsunamiSeverity::from_probability(probability),
        )?;
        Ok(TsunamiResult {
            inputs,
            probability,
            severity,
        })
    }
}

/// A tsunami prediction on its way to the result page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TsunamiResult {
    /// Readings the prediction was made from.
    pub inputs: TsunamiInputs,
    /// Probability of a tsunami.
    pub probability: f64,
    /// Severity band.
    pub severity: TsunamiSeverity,
}

impl TsunamiResult {
    /// Redirect target carrying this result.
    #[must_use]
    pub fn result_url(&self) -> String {
        query::with_query(
            "/result",
            &[
                ("magnitude", self.inputs.magnitude.to_string()),
                ("depth", self.inputs.depth.to_string()),
                ("latitude", self.inputs.latitude.to_string()),
                ("longitude", self.inputs.longitude.to_string()),
                ("tsunami_probability", self.probability.to_string()),
                ("tsunami_severity", self.severity.to_string()),
            ],
        )
    }
}

// ── Shared ──────────────────────────────────────────────────────────

/// `GET /health` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flood_form(place: &str, a: &str, b: Option<&str>, c: &str) -> FloodPredictionForm {
        FloodPredictionForm {
            place: Some(place.to_string()),
            a: Some(a.to_string()),
            b: b.map(String::from),
            c: Some(c.to_string()),
        }
    }

    #[test]
    fn parses_flood_form() {
        let inputs = flood_form("Patna", "1", Some(" 2.5 "), "-3e0").parse().unwrap();
        assert_eq!(inputs.place, "Patna");
        assert_eq!(inputs.features, [1.0, 2.5, -3.0]);
    }

    #[test]
    fn missing_b_is_reported() {
        assert_eq!(
            flood_form("Patna", "1", None, "1").parse(),
            Err(FieldError::Missing { field: "b" })
        );
        assert_eq!(
            flood_form("Patna", "1", Some(""), "1").parse(),
            Err(FieldError::Missing { field: "b" })
        );
    }

    #[test]
    fn non_numeric_and_non_finite_are_rejected() {
        assert!(matches!(
            flood_form("Patna", "lots", Some("1"), "1").parse(),
            Err(FieldError::NotNumeric { field: "a", .. })
        ));
        assert!(matches!(
            flood_form("Patna", "1", Some("1"), "NaN").parse(),
            Err(FieldError::NotNumeric { field: "c", .. })
        ));
        assert!(matches!(
            flood_form("Patna", "inf", Some("1"), "1").parse(),
            Err(FieldError::NotNumeric { field: "a", .. })
        ));
    }

    #[test]
    fn flood_result_survives_the_redirect() {
        let result = FloodResult {
            place: "New Delhi & NCR".to_string(),
            prediction: 9.123_456_789,
            severity: FloodSeverity::VeryHigh,
        };
        let url = result.show_map_url();
        assert_eq!(
            url,
            "/show_map?place=New+Delhi+%26+NCR&prediction=9.123456789&severity=Very+High"
        );

        let params = ShowMapParams {
            place: Some("New Delhi & NCR".to_string()),
            prediction: Some("9.123456789".to_string()),
            severity: Some("Very High".to_string()),
        };
        assert_eq!(params.parse().unwrap(), result);
    }

    #[test]
    fn show_map_rejects_unknown_severity() {
        let params = ShowMapParams {
            place: Some("Patna".to_string()),
            prediction: Some("5".to_string()),
            severity: Some("Catastrophic".to_string()),
        };
        assert!(matches!(
            params.parse(),
            Err(FieldError::Unknown {
                field: "severity",
                ..
            })
        ));
    }

    #[test]
    fn show_map_rejects_label_that_contradicts_score() {
        let params = ShowMapParams {
            place: Some("Patna".to_string()),
            prediction: Some("1".to_string()),
            severity: Some("Very High".to_string()),
        };
        assert_eq!(
            params.parse(),
            Err(FieldError::Inconsistent {
                field: "severity",
                value: "Very High".to_string(),
                expected: "No".to_string(),
            })
        );
    }

    #[test]
    fn result_rejects_label_that_contradicts_probability() {
        let params = ResultParams {
            magnitude: Some("6".to_string()),
            depth: Some("10".to_string()),
            latitude: Some("0".to_string()),
            longitude: Some("0".to_string()),
            tsunami_probability: Some("0.2".to_string()),
            tsunami_severity: Some("High".to_string()),
        };
        assert!(matches!(
            params.parse(),
            Err(FieldError::Inconsistent {
                field: "tsunami_severity",
                ..
            })
        ));
    }

    #[test]
    fn parses_tsunami_form() {
        let form = TsunamiForm {
            magnitude: Some("7.8".to_string()),
            depth: Some("25".to_string()),
            latitude: Some("38.3".to_string()),
            longitude: Some("142.4".to_string()),
        };
        let inputs = form.parse().unwrap();
        assert_eq!(inputs.features(), [7.8, 25.0, 38.3, 142.4]);
    }

    #[test]
    fn tsunami_coordinates_are_range_checked() {
        let form = TsunamiForm {
            magnitude: Some("7.8".to_string()),
            depth: Some("25".to_string()),
            latitude: Some("95".to_string()),
            longitude: Some("142.4".to_string()),
        };
        assert!(matches!(
            form.parse(),
            Err(FieldError::OutOfRange {
                field: "latitude",
                ..
            })
        ));
    }

    #[test]
    fn tsunami_result_survives_the_redirect() {
        let result = TsunamiResult {
            inputs: TsunamiInputs {
                magnitude: 8.1,
                depth: 10.0,
                latitude: -3.5,
                longitude: 101.25,
            },
            probability: 0.934,
            severity: TsunamiSeverity::High,
        };
        let url = result.result_url();
        assert!(url.starts_with("/result?magnitude=8.1&depth=10&latitude=-3.5"));
        assert!(url.ends_with("tsunami_probability=0.934&tsunami_severity=High"));

        let params = ResultParams {
            magnitude: Some("8.1".to_string()),
            depth: Some("10".to_string()),
            latitude: Some("-3.5".to_string()),
            longitude: Some("101.25".to_string()),
            tsunami_probability: Some("0.934".to_string()),
            tsunami_severity: Some("High".to_string()),
        };
        assert_eq!(params.parse().unwrap(), result);
    }

    #[test]
    fn health_serializes_camel_case() {
        let json = serde_json::to_value(ApiHealth {
            healthy: true,
            version: "0.1.0".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "healthy": true, "version": "0.1.0" }));
    }
}
