#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web servers for Rescue Radar.
//!
//! Two independent applications share this crate:
//!
//! - [`flood`]: takes a place name and three indicators, predicts a
//!   disaster score, and shows it on a geocoded map with a severity legend.
//! - [`tsunami`]: takes seismic readings, predicts a tsunami probability,
//!   emails an alert when severity is High, and shows the epicentre on a
//!   map.
//!
//! Model artifacts are loaded once at startup and shared read-only by all
//! workers. Every failure inside a request is a [`HandlerError`] that
//! redirects the browser to `/error`.

pub mod config;
pub mod flood;
mod handlers;
pub mod pages;
pub mod tsunami;

#[cfg(test)]
mod test_support;

use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::{HttpResponse, ResponseError};
use rescue_radar_geocoder::GeocodeError;
use rescue_radar_notifier::NotifyError;
use rescue_radar_predictor::{ModelError, PredictError};
use rescue_radar_server_models::FieldError;
use thiserror::Error;

/// Path every failed request is redirected to.
pub const ERROR_PATH: &str = "/error";

/// Errors raised while handling a single request.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// A form or query field was missing or malformed.
    #[error("Invalid input: {0}")]
    Field(#[from] FieldError),

    /// The model rejected the input.
    #[error("Prediction failed: {0}")]
    Predict(#[from] PredictError),

    /// The place could not be geocoded.
    #[error("Geocoding failed: {0}")]
    Geocode(#[from] GeocodeError),

    /// An embedded page is missing.
    #[error("Page '{name}' not found")]
    MissingPage {
        /// Template file name.
        name: String,
    },
}

impl ResponseError for HandlerError {
    fn status_code(&self) -> StatusCode {
        StatusCode::SEE_OTHER
    }

    fn error_response(&self) -> HttpResponse {
        log::error!("Request failed: {self}");
        see_other(ERROR_PATH)
    }
}

/// Errors that stop a server from starting.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A model artifact could not be loaded.
    #[error("Failed to load model: {0}")]
    Model(#[from] ModelError),

    /// The geocoder is misconfigured.
    #[error("Failed to configure geocoder: {0}")]
    Geocoder(#[from] GeocodeError),

    /// The mail relay is misconfigured.
    #[error("Failed to configure notifier: {0}")]
    Notifier(#[from] NotifyError),

    /// The HTTP server failed to bind or run.
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// `303 See Other` redirect to `location`.
#[must_use]
pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}
