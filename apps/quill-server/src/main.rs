//! # Quill Server
//!
//! Actix-web entry point exposing the blog core over JSON.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!("Starting Quill server on {}:{}", config.host, config.port);

    let state = AppState::new(&config).await;

    if let Err(e) = state.credentials.restore().await {
        tracing::error!(error = %e, "Failed to restore session");
    }

    // Posts load in the background; routes answer 503 until it finishes.
    let posts = state.posts.clone();
    actix_rt::spawn(async move { posts.load().await });

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
