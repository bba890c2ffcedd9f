//! Match catalog & roster endpoints.

use actix_web::{delete, get, post, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::db::models::{Match, MatchDraft, MatchId, MatchStatus};
use crate::http::players::PlayerView;
use crate::metrics;
use crate::roster::{Result, RosterError, RosterService};

//////////////////////////////////////////////////
// Data transfer objects
//////////////////////////////////////////////////

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    pub id: MatchId,
    pub date: DateTime<Utc>,
    pub location: String,
    pub venue_name: String,
    pub map_link: Option<String>,
    pub min_players: i32,
    pub max_players: i32,
    pub players: Vec<PlayerView>,
    pub status: MatchStatus,
    /// Same information as `status`, kept for older clients.
    pub active: bool,
}

impl From<Match> for MatchView {
    fn from(m: Match) -> Self {
        MatchView {
            id: m.id,
            date: m.date,
            location: m.location,
            venue_name: m.venue_name,
            map_link: m.map_link,
            min_players: m.min_players,
            max_players: m.max_players,
            players: m.players.into_iter().map(PlayerView::from).collect(),
            active: m.status.is_active(),
            status: m.status,
        }
    }
}

/// Body for both join & leave.
#[derive(Deserialize)]
pub struct RosterRequest {
    pub name: String,
}

fn message(text: &str) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": text }))
}

/// Record the outcome of `op` and pass the result through.
fn counted<T>(op: &str, res: Result<T>) -> Result<T> {
    metrics::record(op, res.as_ref().map_or_else(RosterError::label, |_| "ok"));
    res
}

//////////////////////////////////////////////////
// Handlers
//////////////////////////////////////////////////

/// GET /api/matches
#[get("/matches")]
pub async fn list(svc: web::Data<RosterService>) -> Result<HttpResponse> {
    let matches = svc.list_matches().await?;
    let out: Vec<MatchView> = matches.into_iter().map(MatchView::from).collect();
    Ok(HttpResponse::Ok().json(out))
}

/// POST /api/matches
#[post("/matches")]
pub async fn create(
    draft: web::Json<MatchDraft>,
    svc: web::Data<RosterService>,
) -> Result<HttpResponse> {
    let created = counted("create", svc.create_match(draft.into_inner()).await)?;
    Ok(HttpResponse::Created().json(MatchView::from(created)))
}

/// POST /api/matches/{id}/join
#[post("/matches/{id}/join")]
pub async fn join(
    path: web::Path<MatchId>,
    info: web::Json<RosterRequest>,
    svc: web::Data<RosterService>,
) -> Result<HttpResponse> {
    counted("join", svc.join(path.into_inner(), &info.name).await)?;
    Ok(message("Successfully joined match"))
}

/// DELETE /api/matches/{id}/leave
#[delete("/matches/{id}/leave")]
pub async fn leave(
    path: web::Path<MatchId>,
    info: web::Json<RosterRequest>,
    svc: web::Data<RosterService>,
) -> Result<HttpResponse> {
    counted("leave", svc.leave(path.into_inner(), &info.name).await)?;
    Ok(message("Successfully left match"))
}

/// DELETE /api/matches/{id} (soft delete)
#[delete("/matches/{id}")]
pub async fn cancel(path: web::Path<MatchId>, svc: web::Data<RosterService>) -> Result<HttpResponse> {
    counted("cancel", svc.cancel(path.into_inner()).await)?;
    Ok(message("Match successfully cancelled"))
}

/// POST /api/matches/{id}/restore
#[post("/matches/{id}/restore")]
pub async fn restore(path: web::Path<MatchId>, svc: web::Data<RosterService>) -> Result<HttpResponse> {
    counted("restore", svc.restore(path.into_inner()).await)?;
    Ok(message("Match successfully restored"))
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list)
        .service(create)
        .service(join)
        .service(leave)
        .service(cancel)
        .service(restore);
}
