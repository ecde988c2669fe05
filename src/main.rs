use std::sync::Arc;

use media_analytics::{
    api::{api_router, AppState},
    config::AppConfig,
    db::DBLayer,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // -----------------------------
    // Logging
    // -----------------------------
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    info!(?config, "starting media analytics");

    // -----------------------------
    // Shared state / Dependencies
    // -----------------------------
    let db = Arc::new(DBLayer::new(&config.db_path)?);
    let state = AppState::build(&config, db).await?;

    // -----------------------------
    // Routers
    // -----------------------------
    let app = api_router()
        // CORS for frontend
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state);

    let listener = TcpListener::bind(config.http_addr).await?;
    info!(addr = %config.http_addr, "HTTP listening");
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
