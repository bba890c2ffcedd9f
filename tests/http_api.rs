//! End-to-end HTTP behaviour over the in-memory store.

use std::sync::Arc;

use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};
use sportmanager_server::db::MemoryStore;
use sportmanager_server::http::{self, matches::MatchView, players::PlayerView};
use sportmanager_server::roster::{MatchDefaults, RosterService};

macro_rules! app {
    () => {{
        let svc = RosterService::new(Arc::new(MemoryStore::new()), MatchDefaults::default());
        test::init_service(
            App::new()
                .wrap(http::routes::cors_headers())
                .app_data(web::Data::new(svc))
                .configure(http::routes::init_routes)
                .default_service(web::route().to(http::routes::fallback)),
        )
        .await
    }};
}

#[actix_web::test]
async fn create_join_list_roundtrip() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/api/matches")
        .set_json(json!({ "date": "2030-05-01T19:00:00Z", "location": "Field A" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: MatchView = test::read_body_json(resp).await;
    assert_eq!(created.venue_name, "Nova Sports Soccer Field");
    assert_eq!((created.min_players, created.max_players), (10, 12));
    assert!(created.active);

    let req = test::TestRequest::post()
        .uri(&format!("/api/matches/{}/join", created.id))
        .set_json(json!({ "name": "Alice" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Successfully joined match");

    let req = test::TestRequest::get().uri("/api/matches").to_request();
    let listed: Vec<MatchView> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].players.len(), 1);
    assert_eq!(listed[0].players[0].name, "Alice");
}

#[actix_web::test]
async fn full_match_is_400() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/matches")
        .set_json(json!({ "date": "2030-05-01T19:00:00Z", "location": "Court", "maxPlayers": 1 }))
        .to_request();
    let created: MatchView = test::call_and_read_body_json(&app, req).await;

    for (name, status) in [("Alice", StatusCode::OK), ("Bob", StatusCode::BAD_REQUEST)] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/matches/{}/join", created.id))
            .set_json(json!({ "name": name }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), status);
        if status == StatusCode::BAD_REQUEST {
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "Match is full");
        }
    }
}

#[actix_web::test]
async fn unknown_match_and_player_are_404() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/api/matches/42/join")
        .set_json(json!({ "name": "Alice" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete().uri("/api/matches/abc").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/api/matches")
        .set_json(json!({ "date": "2030-05-01T19:00:00Z", "location": "Field A" }))
        .to_request();
    let created: MatchView = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/matches/{}/leave", created.id))
        .set_json(json!({ "name": "NobodyEver" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Player not found");
}

#[actix_web::test]
async fn cancel_and_restore_flip_active_flag() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/matches")
        .set_json(json!({ "date": "2030-05-01T19:00:00Z", "location": "Field A" }))
        .to_request();
    let created: MatchView = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/matches/{}", created.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Match successfully cancelled");

    let req = test::TestRequest::get().uri("/api/matches").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed[0]["active"], false);
    assert_eq!(listed[0]["status"], "cancelled");

    let req = test::TestRequest::post()
        .uri(&format!("/api/matches/{}/restore", created.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Match successfully restored");
}

#[actix_web::test]
async fn players_endpoints() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/api/players")
        .set_json(json!({ "name": "Bo", "telegramId": 1234 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: PlayerView = test::read_body_json(resp).await;
    assert_eq!(created.telegram_id, Some(1234));

    let req = test::TestRequest::post()
        .uri("/api/players")
        .set_json(json!({ "name": "Bo" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get().uri("/api/players").to_request();
    let players: Vec<PlayerView> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].name, "Bo");
}

#[actix_web::test]
async fn malformed_body_is_400() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/matches")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid request body");
}

#[actix_web::test]
async fn health_and_cors_preflight() {
    let app = app!();

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("Access-Control-Allow-Origin").unwrap(),
        "*"
    );
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/api/matches/1/join")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}
