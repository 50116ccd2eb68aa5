//! Handlers and extractor settings shared by both servers.

use actix_web::error::{InternalError, QueryPayloadError, UrlencodedError};
use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, web};
use rescue_radar_server_models::ApiHealth;

use crate::{ERROR_PATH, HandlerError, pages, see_other};

/// `GET /health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /error`
pub async fn error_page() -> Result<HttpResponse, HandlerError> {
    html_page("error.html")
}

/// Serves an embedded page as-is.
pub fn html_page(name: &str) -> Result<HttpResponse, HandlerError> {
    Ok(html(pages::page(name)?.to_string()))
}

/// `200 OK` with an HTML body.
pub fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

/// Form bodies that cannot be decoded go to the error page.
pub fn form_config() -> web::FormConfig {
    web::FormConfig::default().error_handler(|err: UrlencodedError, req: &HttpRequest| {
        log::error!("Rejected form body for {}: {err}", req.path());
        InternalError::from_response(err, see_other(ERROR_PATH)).into()
    })
}

/// Query strings that cannot be decoded go to the error page.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, req: &HttpRequest| {
        log::error!("Rejected query string for {}: {err}", req.path());
        InternalError::from_response(err, see_other(ERROR_PATH)).into()
    })
}
