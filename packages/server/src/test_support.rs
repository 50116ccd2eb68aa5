//! In-process stand-ins for the geocoder and mail relay.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rescue_radar_geocoder::{GeocodeError, GeocodedPlace, Geocoder};
use rescue_radar_notifier::{Alert, Notifier};
use rescue_radar_predictor::artifact::{LinearModel, LogisticModel, StandardScaler};
use rescue_radar_predictor::{FloodPredictor, TsunamiPredictor};

/// Score is `a + b + c`, so severities are easy to aim for.
pub fn sum_flood_predictor() -> FloodPredictor {
    FloodPredictor::new(LinearModel {
        coefficients: vec![1.0, 1.0, 1.0],
        intercept: 0.0,
    })
    .unwrap()
}

/// Probability rises steeply with magnitude around 7.
pub fn magnitude_tsunami_predictor() -> TsunamiPredictor {
    TsunamiPredictor::new(
        StandardScaler {
            mean: vec![7.0, 0.0, 0.0, 0.0],
            scale: vec![0.25, 1.0, 1.0, 1.0],
        },
        LogisticModel {
            coefficients: vec![2.0, 0.0, 0.0, 0.0],
            intercept: 0.0,
        },
    )
    .unwrap()
}

/// Answers from a fixed table; unknown places return no match.
#[derive(Default)]
pub struct TableGeocoder {
    places: BTreeMap<String, (f64, f64)>,
    status: Option<u16>,
    pub calls: AtomicUsize,
}

impl TableGeocoder {
    pub fn with(mut self, place: &str, lat: f64, lon: f64) -> Self {
        self.places.insert(place.to_string(), (lat, lon));
        self
    }

    /// Every lookup fails with this HTTP status.
    pub fn failing(status: u16) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Geocoder for TableGeocoder {
    async fn search(&self, place: &str) -> Result<Option<GeocodedPlace>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.status {
            return Err(GeocodeError::Status { status });
        }
        // Yield so concurrent requests interleave.
        tokio::task::yield_now().await;
        Ok(self
            .places
            .get(place)
            .map(|&(latitude, longitude)| GeocodedPlace {
                latitude,
                longitude,
                display_name: Some(place.to_string()),
            }))
    }
}

/// Records every alert; optionally behaves like a relay rejecting the login.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Alert>>,
    pub attempts: AtomicUsize,
    reject_auth: bool,
}

impl RecordingNotifier {
    pub fn rejecting_auth() -> Self {
        Self {
            reject_auth: true,
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn default_recipient(&self) -> &str {
        "ops@example.com"
    }

    async fn send_alert(&self, alert: &Alert) {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.reject_auth {
            log::error!("Alert '{}' not sent: 535 authentication failed", alert.subject);
            return;
        }
        self.sent.lock().unwrap().push(alert.clone());
    }
}
