mod config;
mod db;
mod error;
mod routes;
mod services;
mod state;
mod views;

use std::time::Duration;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env().expect("invalid configuration");
    let backend = state::Backend::from_config(&config)
        .await
        .expect("backend init failed");

    let port = config.port;
    let sweep = Duration::from_secs(config.session_sweep_secs.max(1));
    let state = state::AppState::new(config, backend);

    // Spawn background idle-session sweeper.
    let _sweeper = services::registry::spawn_sweeper(state.sessions.clone(), sweep);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "vacapp listening");
    axum::serve(listener, app).await.expect("server failed");
}
