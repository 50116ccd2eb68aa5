//! Tsunami vulnerability server.
//!
//! `POST /` predicts a tsunami probability from seismic readings, emails
//! an alert when the severity is High, and redirects to `/result`, which
//! shows the epicentre on an embedded map.

use std::sync::Arc;

use actix_web::{App, HttpResponse, HttpServer, middleware, web};
use rescue_radar_map::html::escape_html;
use rescue_radar_map::{DEFAULT_ZOOM, LatLng, MapDocument, Marker, Popup, popup_rows};
use rescue_radar_notifier::{
    Alert, DisabledNotifier, Notifier, SmtpConfig, SmtpNotifier, TSUNAMI_ALERT_BODY,
};
use rescue_radar_predictor::{Predictor, TsunamiPredictor};
use rescue_radar_server_models::{ResultParams, TsunamiForm, TsunamiResult};
use rescue_radar_severity_models::TsunamiSeverity;

use crate::config::TsunamiConfig;
use crate::handlers::{self, html, html_page};
use crate::{HandlerError, ServerError, pages, see_other};

const STARTUP_ALERT_SUBJECT: &str = "TSUNAMI HIGH ALERT";
const STARTUP_ALERT_BODY: &str =
    "Tsunami Alert. There is a tsunami high alert in your area. Please take care.";

/// Shared state for the tsunami server.
pub struct TsunamiState {
    /// Probability model.
    pub predictor: Arc<dyn Predictor>,
    /// Alert delivery.
    pub notifier: Arc<dyn Notifier>,
}

/// Registers the tsunami routes.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(handlers::form_config())
        .app_data(handlers::query_config())
        .route("/", web::get().to(index))
        .route("/", web::post().to(submit))
        .route("/result", web::get().to(result))
        .route("/error", web::get().to(handlers::error_page))
        .route("/health", web::get().to(handlers::health));
}

/// `GET /`
pub async fn index() -> Result<HttpResponse, HandlerError> {
    html_page("index.html")
}

/// `POST /`
///
/// Predicts, alerts on High severity, and redirects to the result page.
/// Alert delivery problems are logged by the notifier and never change
/// the response.
pub async fn submit(
    state: web::Data<TsunamiState>,
    form: web::Form<TsunamiForm>,
) -> Result<HttpResponse, HandlerError> {
    let inputs = form.parse()?;
    let probability = state.predictor.predict(&inputs.features())?;
    let severity = TsunamiSeverity::from_probability(probability);

    log::info!(
        "Tsunami prediction for M{} at ({}, {}): {probability:.4} ({severity})",
        inputs.magnitude,
        inputs.latitude,
        inputs.longitude
    );

    if severity.is_alert() {
        let alert = Alert::tsunami_high(state.notifier.default_recipient());
        state.notifier.send_alert(&alert).await;
    }

    let result = TsunamiResult {
        inputs,
        probability,
        severity,
    };
    Ok(see_other(&result.result_url()))
}

/// `GET /result`
pub async fn result(params: web::Query<ResultParams>) -> Result<HttpResponse, HandlerError> {
    let result = params.parse()?;
    Ok(html(result_page(&result)?))
}

/// Renders the result page with its embedded epicentre map.
///
/// # Errors
///
/// Returns [`HandlerError::MissingPage`] if the page template is missing.
pub fn result_page(result: &TsunamiResult) -> Result<String, HandlerError> {
    let map = tsunami_map(result);
    let banner = if result.severity.is_alert() {
        format!(
            "<div class=\"alert alert-danger\" role=\"alert\">{}</div>",
            escape_html(TSUNAMI_ALERT_BODY)
        )
    } else {
        String::new()
    };

    let fragment = map.render_fragment();

    pages::render(
        "result.html",
        &[
            ("alert", banner.as_str()),
            ("severity", result.severity.as_ref()),
            ("map", fragment.as_str()),
        ],
    )
}

/// Builds the epicentre map for a tsunami result.
#[must_use]
pub fn tsunami_map(result: &TsunamiResult) -> MapDocument {
    let location = LatLng::new(result.inputs.latitude, result.inputs.longitude);

    let mut map = MapDocument::new(location, DEFAULT_ZOOM);
    map.add_marker(Marker {
        location,
        color: result.severity.marker_color(),
        popup: Some(Popup {
            html: popup_rows(&[
                (
                    "Location",
                    format!("{}, {}", result.inputs.latitude, result.inputs.longitude),
                ),
                ("Severity", result.severity.to_string()),
                ("Probability", format!("{:.2}", result.probability)),
            ]),
            max_width: 300,
        }),
    });
    map
}

/// Picks the SMTP relay from the environment, or a logging stand-in when
/// none is configured.
///
/// # Errors
///
/// Returns [`ServerError::Notifier`] if the SMTP settings are present but
/// incomplete or malformed.
pub fn notifier_from_env() -> Result<Arc<dyn Notifier>, ServerError> {
    match SmtpConfig::from_env()? {
        Some(config) => {
            log::info!("Sending alerts via {}:{} to {}", config.host, config.port, config.to);
            Ok(Arc::new(SmtpNotifier::new(&config)?))
        }
        None => {
            log::warn!("SMTP_HOST is not set; email alerts are disabled");
            let recipient = std::env::var("ALERT_TO").unwrap_or_default();
            Ok(Arc::new(DisabledNotifier::new(recipient)))
        }
    }
}

/// Loads the model and scaler and serves until shutdown.
///
/// # Errors
///
/// Returns [`ServerError`] if an artifact cannot be loaded, the mail relay
/// is misconfigured, or the server fails to bind.
pub async fn run_server(config: &TsunamiConfig) -> Result<(), ServerError> {
    log::info!(
        "Loading tsunami model from {} (scaler {})...",
        config.model.display(),
        config.scaler.display()
    );
    let predictor = TsunamiPredictor::load(&config.scaler, &config.model)?;
    let notifier = notifier_from_env()?;

    if config.startup_alert {
        let alert = Alert::new(
            STARTUP_ALERT_SUBJECT,
            STARTUP_ALERT_BODY,
            notifier.default_recipient(),
        );
        notifier.send_alert(&alert).await;
    }

    let state = web::Data::new(TsunamiState {
        predictor: Arc::new(predictor),
        notifier,
    });

    log::info!("Starting tsunami server on {}:{}", config.bind, config.port);

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
