use std::sync::Arc;
use std::time::Duration;

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use sportmanager_server::{bot, config::settings, db::PgStore, http, metrics, roster::RosterService};
use sqlx::postgres::PgPoolOptions;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Configuration
    let settings = settings();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(settings.log_filter()))
        .init();

    let database_url = settings
        .database_url
        .as_deref()
        .context("DATABASE_URL (or PGHOST/PGUSER/PGDATABASE) must be set")?;

    // Postgres pool
    let db_pool = PgPoolOptions::new()
        .max_connections(settings.db_max_connections)
        .connect(database_url)
        .await
        .context("Failed to create Postgres pool")?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("Failed to apply migrations")?;
    log::info!("migrations applied");

    let store = Arc::new(PgStore::new(db_pool.clone()));
    let service = web::Data::new(RosterService::new(store, settings.match_defaults()));
    let enable_bot = settings.enable_bot;

    // Start HTTP server
    let server = HttpServer::new(move || {
        let app = App::new()
            .wrap(Logger::default())
            .wrap(http::routes::cors_headers())
            .wrap(metrics::METRICS.clone())
            .app_data(service.clone())
            .configure(http::routes::init_routes)
            .default_service(web::route().to(http::routes::fallback));
        if enable_bot {
            app.configure(bot::webhook::init_routes)
        } else {
            app
        }
    })
    .shutdown_timeout(settings.shutdown_timeout)
    .bind(&settings.server_addr)
    .with_context(|| format!("Failed to bind {}", settings.server_addr))?;

    log::info!(
        "listening on {} (env={}, bot={})",
        settings.server_addr,
        settings.env,
        enable_bot
    );

    // actix handles SIGINT/SIGTERM and drains within `shutdown_timeout`
    server.run().await.context("server error")?;

    log::info!("Shutting down: closing database pool");
    tokio::time::timeout(Duration::from_secs(settings.shutdown_timeout), db_pool.close())
        .await
        .ok();
    log::info!("Server exiting");
    Ok(())
}
