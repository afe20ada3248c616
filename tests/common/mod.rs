#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use ride_map_service::models::{Coordinate, Driver, MarkerData};
use ride_map_service::{MapError, RoutingError, RoutingProvider};

pub const REFERENCE_POLYLINE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

pub const USER: Coordinate = Coordinate {
    latitude: 37.7749,
    longitude: -122.4194,
};

pub const DESTINATION: Coordinate = Coordinate {
    latitude: 37.4419,
    longitude: -122.1430,
};

/// Outcome of one fake routing request
#[derive(Debug, Clone, Copy)]
pub enum FakeLeg {
    Ok { seconds: u64, delay_ms: u64 },
    Fail,
}

type LegFn = dyn Fn(Coordinate, Coordinate) -> FakeLeg + Send + Sync;

/// In-process routing provider with scripted answers and a request counter
pub struct FakeProvider {
    configured: bool,
    legs: Box<LegFn>,
    polyline: Option<String>,
    calls: AtomicUsize,
}

impl FakeProvider {
    pub fn new(legs: impl Fn(Coordinate, Coordinate) -> FakeLeg + Send + Sync + 'static) -> Self {
        Self {
            configured: true,
            legs: Box::new(legs),
            polyline: Some(REFERENCE_POLYLINE.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Every leg takes `seconds`, answered immediately
    pub fn constant(seconds: u64) -> Self {
        Self::new(move |_, _| FakeLeg::Ok {
            seconds,
            delay_ms: 0,
        })
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::constant(60)
        }
    }

    pub fn with_polyline(mut self, polyline: Option<&str>) -> Self {
        self.polyline = polyline.map(str::to_string);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RoutingProvider for FakeProvider {
    fn ensure_configured(&self) -> Result<(), MapError> {
        if self.configured {
            Ok(())
        } else {
            Err(MapError::missing_api_key())
        }
    }

    async fn route_duration(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<u64, MapError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match (self.legs)(origin, destination) {
            FakeLeg::Ok { seconds, delay_ms } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok(seconds)
            }
            FakeLeg::Fail => Err(RoutingError::Api {
                status: 500,
                message: "backend unavailable".to_string(),
            }
            .into()),
        }
    }

    async fn route_polyline(
        &self,
        _origin: Coordinate,
        _destination: Coordinate,
    ) -> Result<Option<String>, MapError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.polyline.clone())
    }
}

/// Markers with ids 1..=count, each one 0.001 degrees further north of the user
pub fn markers(count: i64) -> Vec<MarkerData> {
    (1..=count)
        .map(|id| {
            let driver = Driver::new(id, "Driver", &id.to_string());
            MarkerData {
                title: driver.display_name(),
                driver,
                latitude: USER.latitude + id as f64 * 0.001,
                longitude: USER.longitude,
                estimate: None,
            }
        })
        .collect()
}

/// Recover the marker id from a marker position produced by `markers`
pub fn marker_id(position: Coordinate) -> i64 {
    ((position.latitude - USER.latitude) / 0.001).round() as i64
}
