pub mod map;

use axum::{
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::services::{MapService, RoutingProvider};

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "ride-map-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Build the HTTP surface over a map service
pub fn router<P: RoutingProvider + 'static>(service: Arc<MapService<P>>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/health", get(health))
        .route("/api/map/markers", post(map::markers::<P>))
        .route("/api/map/region", post(map::region::<P>))
        .route("/api/map/driver-times", post(map::driver_times::<P>))
        .route("/api/map/route", post(map::route::<P>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}
