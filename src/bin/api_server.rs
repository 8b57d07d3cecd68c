// API Server Binary Entry Point
//
// Purpose: Serve crop recommendations over HTTP
// Usage: cargo run --features api --bin api_server

use crop_planner::{create_router, AppState, OptimizerConfig};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "crop_planner=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    // Configuration from environment variables
    let catalog_path = std::env::var("CATALOG_PATH")
        .unwrap_or_else(|_| "data/plants.json".to_string());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let perennial_multiplier: Option<f64> = std::env::var("PERENNIAL_MULTIPLIER")
        .ok()
        .and_then(|m| m.parse().ok());

    tracing::info!("Configuration:");
    tracing::info!("  CATALOG_PATH: {}", catalog_path);
    tracing::info!("  PORT: {}", port);
    tracing::info!("  PERENNIAL_MULTIPLIER: {:?}", perennial_multiplier);

    let config = OptimizerConfig { perennial_multiplier };
    let state = AppState::new(&catalog_path, config)?;
    tracing::info!("Application state initialized successfully");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
