//! Compile-time geocoding service configuration.
//!
//! The Nominatim provider is defined in `services/nominatim.toml` and
//! embedded at compile time. Deployments can override individual fields
//! from the environment without rebuilding:
//!
//! | Variable                 | Field          |
//! |--------------------------|----------------|
//! | `NOMINATIM_URL`          | `base_url`     |
//! | `NOMINATIM_USER_AGENT`   | `user_agent`   |
//! | `GEOCODER_TIMEOUT_SECS`  | `timeout_secs` |

use std::time::Duration;

use serde::Deserialize;

use crate::GeocodeError;

const NOMINATIM_TOML: &str = include_str!("../services/nominatim.toml");

/// A Nominatim service configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingService {
    /// Unique identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Search endpoint (e.g., `"https://nominatim.openstreetmap.org/search"`).
    pub base_url: String,
    /// `User-Agent` header; Nominatim's usage policy requires one.
    pub user_agent: String,
    /// Preferred language for display names.
    #[serde(default = "default_language")]
    pub accept_language: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_language() -> String {
    "en".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

impl GeocodingService {
    /// Parses a service definition.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Config`] if the TOML is malformed or a
    /// required field is empty.
    pub fn from_toml(toml_str: &str) -> Result<Self, GeocodeError> {
        let service: Self = toml::de::from_str(toml_str).map_err(|e| GeocodeError::Config {
            message: format!("Failed to parse geocoding service: {e}"),
        })?;
        service.validate()?;
        Ok(service)
    }

    /// Returns the embedded Nominatim definition.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Config`] if the embedded TOML is invalid.
    pub fn nominatim() -> Result<Self, GeocodeError> {
        Self::from_toml(NOMINATIM_TOML)
    }

    /// Returns the embedded definition with environment overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Config`] if the embedded TOML is invalid or
    /// an override is malformed.
    pub fn from_env() -> Result<Self, GeocodeError> {
        Self::nominatim()?.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up through `lookup` (normally the process
    /// environment).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Config`] if `GEOCODER_TIMEOUT_SECS` is not a
    /// positive integer or an overridden field is empty.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, GeocodeError> {
        if let Some(url) = lookup("NOMINATIM_URL") {
            self.base_url = url;
        }
        if let Some(agent) = lookup("NOMINATIM_USER_AGENT") {
            self.user_agent = agent;
        }
        if let Some(secs) = lookup("GEOCODER_TIMEOUT_SECS") {
            self.timeout_secs = secs.trim().parse().map_err(|_| GeocodeError::Config {
                message: format!("GEOCODER_TIMEOUT_SECS must be an integer, got '{secs}'"),
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<(), GeocodeError> {
        let empty = [
            ("id", &self.id),
            ("base_url", &self.base_url),
            ("user_agent", &self.user_agent),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty());

        if let Some((field, _)) = empty {
            return Err(GeocodeError::Config {
                message: format!("Geocoding service field '{field}' is empty"),
            });
        }
        if self.timeout_secs == 0 {
            return Err(GeocodeError::Config {
                message: "Geocoding timeout must be at least one second".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_embedded_nominatim() {
        let svc = GeocodingService::nominatim().unwrap();
        assert_eq!(svc.id, "nominatim");
        assert!(svc.base_url.starts_with("https://"));
        assert!(!svc.user_agent.is_empty());
        assert_eq!(svc.accept_language, "en");
        assert_eq!(svc.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn applies_overrides() {
        let svc = GeocodingService::nominatim()
            .unwrap()
            .with_overrides(|key| match key {
                "NOMINATIM_URL" => Some("http://localhost:8088/search".to_string()),
                "GEOCODER_TIMEOUT_SECS" => Some("3".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(svc.base_url, "http://localhost:8088/search");
        assert_eq!(svc.timeout_secs, 3);
        assert_eq!(svc.user_agent, "Rescue-Radar/1.0");
    }

    #[test]
    fn rejects_bad_timeout() {
        let err = GeocodingService::nominatim()
            .unwrap()
            .with_overrides(|key| (key == "GEOCODER_TIMEOUT_SECS").then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, GeocodeError::Config { .. }));

        let err = GeocodingService::nominatim()
            .unwrap()
            .with_overrides(|key| (key == "GEOCODER_TIMEOUT_SECS").then(|| "0".to_string()))
            .unwrap_err();
        assert!(matches!(err, GeocodeError::Config { .. }));
    }

    #[test]
    fn rejects_missing_user_agent() {
        let err = GeocodingService::from_toml(
            r#"
            id = "nominatim"
            name = "Nominatim"
            base_url = "https://nominatim.openstreetmap.org/search"
            user_agent = ""
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, GeocodeError::Config { .. }));
    }
}
