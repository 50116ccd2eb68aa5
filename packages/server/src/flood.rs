//! Flood severity map server.
//!
//! `POST /prediction` scores three indicators and redirects to
//! `/show_map`, which geocodes the place and returns a map with a
//! coloured marker and the severity legend. The map is built per request
//! and returned directly as the response body.

use std::sync::Arc;

use actix_web::{App, HttpResponse, HttpServer, middleware, web};
use rescue_radar_geocoder::service_registry::GeocodingService;
use rescue_radar_geocoder::{Geocoder, NominatimGeocoder};
use rescue_radar_map::legend::legend_html;
use rescue_radar_map::{DEFAULT_ZOOM, LatLng, MapDocument, Marker, Popup, TileLayer, popup_rows};
use rescue_radar_predictor::{FloodPredictor, Predictor};
use rescue_radar_server_models::{FloodPredictionForm, FloodResult, ShowMapParams};
use rescue_radar_severity_models::FloodSeverity;

use crate::config::FloodConfig;
use crate::handlers::{self, html, html_page};
use crate::{HandlerError, ServerError, see_other};

/// Shared state for the flood server.
pub struct FloodState {
    /// Flood score model.
    pub predictor: Arc<dyn Predictor>,
    /// Place-name lookup.
    pub geocoder: Arc<dyn Geocoder>,
}

/// Registers the flood routes.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(handlers::form_config())
        .app_data(handlers::query_config())
        .route("/", web::get().to(home))
        .route("/home", web::get().to(home))
        .route("/error", web::get().to(handlers::error_page))
        .route("/aboutproject", web::get().to(about))
        .route("/review", web::get().to(review))
        .route("/prediction", web::post().to(prediction))
        .route("/show_map", web::get().to(show_map))
        .route("/health", web::get().to(handlers::health));
}

/// `GET /` and `GET /home`
pub async fn home() -> Result<HttpResponse, HandlerError> {
    html_page("homepage.html")
}

/// `GET /aboutproject`
pub async fn about() -> Result<HttpResponse, HandlerError> {
    html_page("aboutproject.html")
}

/// `GET /review`
pub async fn review() -> Result<HttpResponse, HandlerError> {
    html_page("review.html")
}

/// `POST /prediction`
///
/// Scores the indicators and redirects to the map for the result.
pub async fn prediction(
    state: web::Data<FloodState>,
    form: web::Form<FloodPredictionForm>,
) -> Result<HttpResponse, HandlerError> {
    let inputs = form.parse()?;
    let score = state.predictor.predict(&inputs.features)?;
    let severity = FloodSeverity::from_score(score);

    log::info!(
        "Flood prediction for '{}': score {score} ({severity})",
        inputs.place
    );

    let result = FloodResult {
        place: inputs.place,
        prediction: score,
        severity,
    };
    Ok(see_other(&result.show_map_url()))
}

/// `GET /show_map`
///
/// Geocodes the place and returns the rendered map page.
pub async fn show_map(
    state: web::Data<FloodState>,
    params: web::Query<ShowMapParams>,
) -> Result<HttpResponse, HandlerError> {
    let result = params.parse()?;

    let center = match state.geocoder.search(&result.place).await? {
        Some(found) => Some(LatLng::new(found.latitude, found.longitude)),
        None => {
            log::warn!(
                "No geocoding match for '{}'; placing marker at (0, 0)",
                result.place
            );
            None
        }
    };

    Ok(html(flood_map(&result, center).render()))
}

/// Builds the map for a flood result.
///
/// `center` is `None` when the place could not be resolved, in which case
/// the map falls back to `(0, 0)` and the popup says so.
#[must_use]
pub fn flood_map(result: &FloodResult, center: Option<LatLng>) -> MapDocument {
    let location = center.unwrap_or_else(LatLng::origin);

    let mut rows = vec![
        ("Place", result.place.clone()),
        ("Prediction", result.prediction.to_string()),
        ("Severity", result.severity.to_string()),
    ];
    if center.is_none() {
        rows.push(("Location", "not found, showing 0, 0".to_string()));
    }

    let mut map = MapDocument::new(location, DEFAULT_ZOOM).with_tiles(TileLayer::esri_world_topo());
    map.add_marker(Marker {
        location,
        color: result.severity.marker_color(),
        popup: Some(Popup {
            html: popup_rows(&rows),
            max_width: 250,
        }),
    })
    .add_overlay(legend_html("Severity Levels", &FloodSeverity::legend()));
    map
}

/// Loads the flood model and serves until shutdown.
///
/// # Errors
///
/// Returns [`ServerError`] if the model cannot be loaded, the geocoder is
/// misconfigured, or the server fails to bind.
pub async fn run_server(config: &FloodConfig) -> Result<(), ServerError> {
    log::info!("Loading flood model from {}...", config.model.display());
    let predictor = FloodPredictor::load(&config.model)?;

    let service = GeocodingService::from_env()?;
    log::info!("Geocoding with {} at {}", service.name, service.base_url);
    let geocoder = NominatimGeocoder::new(service)?;

    let state = web::Data::new(FloodState {
        predictor: Arc::new(predictor),
        geocoder: Arc::new(geocoder),
    });

    log::info!("Starting flood server on {}:{}", config.bind, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(routes)
    })
    .bind((config.bind.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
