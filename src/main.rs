use std::net::{IpAddr, SocketAddr};

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gatelog::api::middleware::session::{create_session_layer, AppState};
use gatelog::config::Config;
use gatelog::db;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatelog=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting gatelog server...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Make sure a fresh instance has an admin to sign in with
    db::bootstrap_admin(&pool, &config).await?;

    // Create session layer
    let session_layer = create_session_layer(pool.clone()).await?;
    tracing::info!("Session layer initialized");

    // Build application state
    let state = AppState { pool: pool.clone() };

    // Build router
    let app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .merge(gatelog::api::auth::router())
        .merge(gatelog::api::students::router())
        .merge(gatelog::api::users::router())
        .merge(gatelog::api::history::router())
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from((config.host.parse::<IpAddr>()?, config.port));
    tracing::info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install CTRL+C signal handler");
    tracing::info!("Shutdown signal received, cleaning up...");
}
