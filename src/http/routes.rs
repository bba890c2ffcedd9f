use actix_web::{
    error::InternalError, http::Method, middleware::DefaultHeaders, web, HttpRequest,
    HttpResponse,
};

use crate::http::{self, errors::error_body};

/// Mount every HTTP sub-module under `/api`, plus the root-level probe.
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .configure(http::health::init_routes)
        .service(
            web::scope("/api")
                .configure(http::matches::init_routes)
                .configure(http::players::init_routes),
        );
}

/// Malformed bodies answer `400 {"error": "Invalid request body"}`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::debug!("rejected body: {err}");
        InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(error_body("Invalid request body")),
        )
        .into()
    })
}

/// A non-numeric match id can never resolve, so it is a 404 like any other
/// unknown id.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        InternalError::from_response(
            err,
            HttpResponse::NotFound().json(error_body("Match not found")),
        )
        .into()
    })
}

/// Permissive CORS headers on every response.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS"))
        .add(("Access-Control-Allow-Headers", "Content-Type, Authorization"))
}

/// Default service: answers CORS preflight, 404 for everything else.
pub async fn fallback(req: HttpRequest) -> HttpResponse {
    if req.method() == Method::OPTIONS {
        HttpResponse::NoContent().finish()
    } else {
        HttpResponse::NotFound().json(error_body("Not found"))
    }
}
