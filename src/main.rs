use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ride_map_service::{config::Config, handlers, MapService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ride_map_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenv::dotenv().ok();
    let config = Config::from_env().context("Failed to load configuration")?;

    info!("Starting ride map service");
    if config.api_key().is_none() {
        warn!("GOOGLE_MAPS_API_KEY is not set; driver times and routes will be unavailable");
    }
    info!(
        "Routes API at {} (travel mode {}, fare {}/min, failure policy {:?})",
        config.routes_base_url,
        config.travel_mode,
        config.fare_rate_per_minute,
        config.failure_policy
    );

    let service =
        MapService::from_config(&config).context("Failed to initialize routes client")?;
    let app = handlers::router(Arc::new(service));

    let addr: std::net::SocketAddr = format!("0.0.0.0:{}", config.port)
        .parse()
        .context("Invalid listen address")?;
    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .await
        .context("Failed to start HTTP server")?;

    info!("Shutting down...");
    Ok(())
}
