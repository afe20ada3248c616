use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::{
    error::MapError,
    libraries::polyline::route_length_meters,
    models::{
        DriverTimesRequest, DriverTimesResponse, ErrorResponse, MarkersRequest, RegionRequest,
        RouteRequest, RouteResponse,
    },
    services::{MapService, RoutingProvider},
};

fn error_response(error: &MapError) -> Response {
    let status = match error {
        MapError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
        MapError::RoutingService(_) | MapError::Decode(_) => StatusCode::BAD_GATEWAY,
    };
    (status, Json(ErrorResponse::new(error.to_string()))).into_response()
}

/// Place the given drivers around the user
pub async fn markers<P: RoutingProvider>(
    State(service): State<Arc<MapService<P>>>,
    Json(request): Json<MarkersRequest>,
) -> Response {
    if !request.user_latitude.is_finite() || !request.user_longitude.is_finite() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::new("User coordinates must be finite numbers")),
        )
            .into_response();
    }

    let markers =
        service.generate_markers(&request.drivers, request.user_latitude, request.user_longitude);
    debug!("Generated {} markers", markers.len());

    Json(markers).into_response()
}

pub async fn region<P: RoutingProvider>(
    State(service): State<Arc<MapService<P>>>,
    Json(request): Json<RegionRequest>,
) -> impl IntoResponse {
    Json(service.calculate_region(
        request.user_latitude,
        request.user_longitude,
        request.destination_latitude,
        request.destination_longitude,
    ))
}

/// Price every marker for the trip. Responds `ready: false` until all four
/// locations are known.
pub async fn driver_times<P: RoutingProvider>(
    State(service): State<Arc<MapService<P>>>,
    Json(request): Json<DriverTimesRequest>,
) -> Response {
    let result = service
        .estimate_driver_times(
            &request.markers,
            request.user_latitude,
            request.user_longitude,
            request.destination_latitude,
            request.destination_longitude,
        )
        .await;

    match result {
        Ok(Some(markers)) => Json(DriverTimesResponse::ready(markers)).into_response(),
        Ok(None) => Json(DriverTimesResponse::not_ready()).into_response(),
        Err(e) => error_response(&e),
    }
}

pub async fn route<P: RoutingProvider>(
    State(service): State<Arc<MapService<P>>>,
    Json(request): Json<RouteRequest>,
) -> Response {
    let result = service
        .fetch_route(
            request.origin_latitude,
            request.origin_longitude,
            request.destination_latitude,
            request.destination_longitude,
        )
        .await;

    match result {
        Ok(coordinates) => {
            let distance_meters = route_length_meters(&coordinates);
            Json(RouteResponse {
                coordinates,
                distance_meters,
            })
            .into_response()
        }
        Err(e) => error_response(&e),
    }
}
