//! Chat-bot commands and the webhook round trip.

use std::sync::Arc;

use actix_web::{test, web, App};
use chrono::{Duration, Utc};
use serde_json::json;
use sportmanager_server::bot::commands::{self, render_matches, Command, HELP, WELCOME};
use sportmanager_server::bot::webhook::{self, SendMessage};
use sportmanager_server::db::models::{MatchDraft, MatchId};
use sportmanager_server::db::MemoryStore;
use sportmanager_server::roster::{MatchDefaults, RosterService};

fn service() -> RosterService {
    RosterService::new(Arc::new(MemoryStore::new()), MatchDefaults::default())
}

async fn upcoming(svc: &RosterService, max_players: i32) -> MatchId {
    svc.create_match(MatchDraft {
        date: Utc::now() + Duration::days(1),
        location: "Field A".into(),
        max_players: Some(max_players),
        ..Default::default()
    })
    .await
    .unwrap()
    .id
}

#[tokio::test]
async fn start_and_help_are_static() {
    let svc = service();
    assert_eq!(commands::execute(&svc, Command::Start, "ana").await, WELCOME);
    assert_eq!(commands::execute(&svc, Command::Help, "ana").await, HELP);
}

#[tokio::test]
async fn join_and_leave_use_sender_name() {
    let svc = service();
    let id = upcoming(&svc, 12).await;

    let reply = commands::execute(&svc, Command::Join(id), "ana").await;
    assert!(reply.contains("you are in"), "{reply}");
    assert_eq!(svc.list_matches().await.unwrap()[0].players[0].name, "ana");

    let reply = commands::execute(&svc, Command::Leave(id), "ana").await;
    assert!(reply.contains("you left"), "{reply}");
    assert_eq!(svc.list_matches().await.unwrap()[0].roster_size(), 0);
}

#[tokio::test]
async fn failures_become_sentences() {
    let svc = service();
    let id = upcoming(&svc, 1).await;
    commands::execute(&svc, Command::Join(id), "ana").await;

    let full = commands::execute(&svc, Command::Join(id), "bo").await;
    assert_eq!(full, format!("Match #{id} is full."));

    let missing = commands::execute(&svc, Command::Join(999), "bo").await;
    assert_eq!(missing, "Match #999 does not exist.");

    let unknown = commands::execute(&svc, Command::Leave(id), "nobody").await;
    assert_eq!(unknown, "I don't know a player called nobody.");
}

#[tokio::test]
async fn matches_lists_only_upcoming_active() {
    let svc = service();
    let open = upcoming(&svc, 12).await;
    let cancelled = upcoming(&svc, 12).await;
    svc.cancel(cancelled).await.unwrap();
    svc.create_match(MatchDraft {
        date: Utc::now() - Duration::days(1),
        location: "Old Field".into(),
        ..Default::default()
    })
    .await
    .unwrap();
    svc.join(open, "ana").await.unwrap();

    let text = render_matches(&svc.list_matches().await.unwrap(), Utc::now());
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2, "{text}");
    assert!(lines[1].starts_with(&format!("#{open} ")));
    assert!(lines[1].ends_with("(1/12)"));

    assert_eq!(render_matches(&[], Utc::now()), "No upcoming matches.");
}

#[actix_web::test]
async fn webhook_replies_inline() {
    let svc = service();
    let id = upcoming(&svc, 12).await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(svc.clone()))
            .configure(webhook::init_routes),
    )
    .await;

    let update = json!({
        "update_id": 1,
        "message": {
            "message_id": 10,
            "chat": { "id": -500, "type": "group" },
            "from": { "id": 9, "is_bot": false, "first_name": "Ana", "username": "ana_fc" },
            "text": format!("/join@SportBot {id}")
        }
    });
    let req = test::TestRequest::post()
        .uri("/bot/webhook")
        .set_json(update)
        .to_request();
    let reply: SendMessage = test::call_and_read_body_json(&app, req).await;

    assert_eq!(reply.method, "sendMessage");
    assert_eq!(reply.chat_id, -500);
    assert!(reply.text.contains("ana_fc"));
    assert_eq!(svc.list_matches().await.unwrap()[0].players[0].name, "ana_fc");
}

#[actix_web::test]
async fn webhook_ignores_plain_text() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service()))
            .configure(webhook::init_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/bot/webhook")
        .set_json(json!({
            "update_id": 2,
            "message": { "chat": { "id": 1 }, "text": "see you all tonight" }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body = test::read_body(resp).await;
    assert!(body.is_empty());
}
