//! Nominatim / OpenStreetMap geocoder client.
//!
//! Nominatim's public instance allows at most one request per second and
//! requires an identifying `User-Agent`. Rescue Radar issues a single
//! lookup per map render, so no client-side rate limiting is done here.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use async_trait::async_trait;

use crate::service_registry::GeocodingService;
use crate::{GeocodeError, GeocodedPlace, Geocoder};

/// Free-form Nominatim search client.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    service: GeocodingService,
}

impl NominatimGeocoder {
    /// Builds a client with the service's timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the HTTP client cannot be built.
    pub fn new(service: GeocodingService) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .user_agent(service.user_agent.clone())
            .timeout(service.timeout())
            .build()?;
        Ok(Self { client, service })
    }

    /// The service definition this client was built from.
    #[must_use]
    pub const fn service(&self) -> &GeocodingService {
        &self.service
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, place: &str) -> Result<Option<GeocodedPlace>, GeocodeError> {
        let resp = self
            .client
            .get(&self.service.base_url)
            .query(&[
                ("q", place),
                ("format", "json"),
                ("addressdetails", "1"),
                ("accept-language", self.service.accept_language.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            log::error!("Nominatim returned status {status} for '{place}'");
            return Err(GeocodeError::Status {
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = resp.json().await?;
        parse_response(&body)
    }
}

/// Parses a Nominatim JSON response, taking the first candidate.
fn parse_response(body: &serde_json::Value) -> Result<Option<GeocodedPlace>, GeocodeError> {
    let results = body.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim response is not an array".to_string(),
    })?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let lat = coordinate(first, "lat")?;
    let lon = coordinate(first, "lon")?;
    let display_name = first["display_name"].as_str().map(String::from);

    Ok(Some(GeocodedPlace {
        latitude: lat,
        longitude: lon,
        display_name,
    }))
}

/// Nominatim encodes coordinates as strings; accept bare numbers too.
fn coordinate(result: &serde_json::Value, key: &str) -> Result<f64, GeocodeError> {
    let value = &result[key];
    value
        .as_str()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .or_else(|| value.as_f64())
        .ok_or_else(|| GeocodeError::Parse {
            message: format!("Missing {key} in Nominatim response"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nominatim_result() {
        let body = serde_json::json!([{
            "lat": "25.6093239",
            "lon": "85.1235252",
            "display_name": "Patna, Patna Rural, Patna, Bihar, India"
        }, {
            "lat": "40.0",
            "lon": "-80.0",
            "display_name": "Patna, somewhere else"
        }]);
        let result = parse_response(&body).unwrap().unwrap();
        assert!((result.latitude - 25.609_323_9).abs() < 1e-6);
        assert!((result.longitude - 85.123_525_2).abs() < 1e-6);
        assert_eq!(
            result.display_name.as_deref(),
            Some("Patna, Patna Rural, Patna, Bihar, India")
        );
    }

    #[test]
    fn parses_nominatim_empty() {
        let body = serde_json::json!([]);
        assert!(parse_response(&body).unwrap().is_none());
    }

    #[test]
    fn accepts_numeric_coordinates() {
        let body = serde_json::json!([{ "lat": 1.5, "lon": -2.25 }]);
        let result = parse_response(&body).unwrap().unwrap();
        assert!((result.latitude - 1.5).abs() < f64::EPSILON);
        assert!((result.longitude + 2.25).abs() < f64::EPSILON);
        assert!(result.display_name.is_none());
    }

    #[test]
    fn rejects_malformed_response() {
        let body = serde_json::json!({ "error": "Unable to geocode" });
        assert!(matches!(
            parse_response(&body),
            Err(GeocodeError::Parse { .. })
        ));

        let body = serde_json::json!([{ "lat": "north", "lon": "10" }]);
        assert!(matches!(
            parse_response(&body),
            Err(GeocodeError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn unreachable_host_is_http_error() {
        let service = GeocodingService::nominatim()
            .unwrap()
            .with_overrides(|key| match key {
                "NOMINATIM_URL" => Some("http://127.0.0.1:9/search".to_string()),
                "GEOCODER_TIMEOUT_SECS" => Some("2".to_string()),
                _ => None,
            })
            .unwrap();
        let geocoder = NominatimGeocoder::new(service).unwrap();
        assert!(matches!(
            geocoder.search("Patna").await,
            Err(GeocodeError::Http(_))
        ));
    }
}
