//! Roster outcome counters are exposed on the shared `/metrics` scrape.

use std::sync::Arc;

use actix_web::{test, web, App};
use serde_json::json;
use sportmanager_server::db::MemoryStore;
use sportmanager_server::http::{self, matches::MatchView};
use sportmanager_server::metrics;
use sportmanager_server::roster::{MatchDefaults, RosterService};

#[actix_web::test]
async fn rejected_join_is_counted_on_metrics_endpoint() {
    let svc = RosterService::new(Arc::new(MemoryStore::new()), MatchDefaults::default());
    let app = test::init_service(
        App::new()
            .wrap(metrics::METRICS.clone())
            .app_data(web::Data::new(svc))
            .configure(http::routes::init_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/matches")
        .set_json(json!({ "date": "2030-05-01T19:00:00Z", "location": "Court", "maxPlayers": 1 }))
        .to_request();
    let created: MatchView = test::call_and_read_body_json(&app, req).await;

    for name in ["Alice", "Bob"] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/matches/{}/join", created.id))
            .set_json(json!({ "name": name }))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let text = String::from_utf8(body.to_vec()).unwrap();

    assert!(
        text.contains(r#"roster_operations_total{op="join",outcome="capacity_exceeded"} 1"#),
        "{text}"
    );
    assert!(text.contains(r#"roster_operations_total{op="join",outcome="ok"} 1"#));
    assert!(text.contains(r#"roster_operations_total{op="create",outcome="ok"} 1"#));
}
