// StudyBalance Backend Entry Point
// Conversational support for students, with a deterministic canned-response core.

mod auth;
mod brain;
mod config;
mod database;
mod engine;
mod error;
mod models;
mod rate_limiter;
mod routes;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use engine::ResponseEngine;
use rate_limiter::RateLimiter;
use routes::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    let pool = database::init_db(&config.database_path).await?;
    let engine = ResponseEngine::new(&config);

    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState {
        pool,
        engine,
        config,
        limiter: Mutex::new(RateLimiter::default()),
    });

    // Periodically drop idle clients from the rate limiter.
    let prune_state = Arc::clone(&state);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            prune_state.limiter.lock().await.prune();
        }
    });

    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Listening on {}", bind_addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}
