//! Liveness / readiness probe

use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;

use crate::roster::RosterService;

#[get("/health")]
pub async fn health(svc: web::Data<RosterService>) -> impl Responder {
    if let Err(e) = svc.ping().await {
        log::error!("health check: database ping failed: {e}");
        return HttpResponse::ServiceUnavailable()
            .json(json!({ "status": "unavailable", "reason": "database connection error" }));
    }

    HttpResponse::Ok().json(json!({ "status": "healthy" }))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health);
}
