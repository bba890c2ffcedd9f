//! Player directory endpoints.

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::db::models::{Player, PlayerId};
use crate::metrics;
use crate::roster::{Result, RosterError, RosterService};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: PlayerId,
    pub telegram_id: Option<i64>,
    pub name: String,
}

impl From<Player> for PlayerView {
    fn from(p: Player) -> Self {
        PlayerView {
            id: p.id,
            telegram_id: p.telegram_id,
            name: p.name,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayerRequest {
    pub name: String,
    #[serde(default)]
    pub telegram_id: Option<i64>,
}

/// GET /api/players
#[get("/players")]
pub async fn list(svc: web::Data<RosterService>) -> Result<HttpResponse> {
    let players = svc.list_players().await?;
    let out: Vec<PlayerView> = players.into_iter().map(PlayerView::from).collect();
    Ok(HttpResponse::Ok().json(out))
}

/// POST /api/players
#[post("/players")]
pub async fn create(
    info: web::Json<CreatePlayerRequest>,
    svc: web::Data<RosterService>,
) -> Result<HttpResponse> {
    let res = svc.create_player(&info.name, info.telegram_id).await;
    metrics::record(
        "register",
        res.as_ref().map_or_else(RosterError::label, |_| "ok"),
    );
    Ok(HttpResponse::Created().json(PlayerView::from(res?)))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list).service(create);
}
