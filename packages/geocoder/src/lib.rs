#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Place-name geocoding for Rescue Radar.
//!
//! Resolves a free-text place name (e.g. "Patna, Bihar") to a
//! latitude/longitude pair using the public Nominatim search API. The
//! provider is described by an embedded TOML file in `services/` (see
//! [`service_registry`]) and can be pointed elsewhere from the
//! environment.
//!
//! Callers go through the [`Geocoder`] trait so request handlers can be
//! exercised without network access.

pub mod nominatim;
pub mod service_registry;

use async_trait::async_trait;
use thiserror::Error;

pub use nominatim::NominatimGeocoder;

/// A geocoding match.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Canonical name returned by the provider.
    pub display_name: Option<String>,
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed (connection, timeout, body decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("Geocoder returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Service configuration is unusable.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem.
        message: String,
    },
}

/// Resolves place names to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Looks up `place` and returns the best match.
    ///
    /// Returns `Ok(None)` when the provider answered but found nothing.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the request fails, the provider answers
    /// with a non-success status, or the response cannot be parsed.
    async fn search(&self, place: &str) -> Result<Option<GeocodedPlace>, GeocodeError>;
}
