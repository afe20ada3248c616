use serde::{Deserialize, Serialize};

use super::driver::{Driver, MarkerData};
use super::location::Coordinate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkersRequest {
    pub drivers: Vec<Driver>,
    pub user_latitude: f64,
    pub user_longitude: f64,
}

// Location fields are optional; missing ones follow the region fallback rules
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionRequest {
    #[serde(default)]
    pub user_latitude: Option<f64>,
    #[serde(default)]
    pub user_longitude: Option<f64>,
    #[serde(default)]
    pub destination_latitude: Option<f64>,
    #[serde(default)]
    pub destination_longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverTimesRequest {
    pub markers: Vec<MarkerData>,
    #[serde(default)]
    pub user_latitude: Option<f64>,
    #[serde(default)]
    pub user_longitude: Option<f64>,
    #[serde(default)]
    pub destination_latitude: Option<f64>,
    #[serde(default)]
    pub destination_longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverTimesResponse {
    /// False when locations were missing and nothing was estimated
    pub ready: bool,
    pub markers: Vec<MarkerData>,
}

impl DriverTimesResponse {
    pub fn ready(markers: Vec<MarkerData>) -> Self {
        Self {
            ready: true,
            markers,
        }
    }

    pub fn not_ready() -> Self {
        Self {
            ready: false,
            markers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub origin_latitude: f64,
    pub origin_longitude: f64,
    pub destination_latitude: f64,
    pub destination_longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    pub coordinates: Vec<Coordinate>,
    pub distance_meters: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
