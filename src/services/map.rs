use futures_util::future::join_all;
use tracing::{debug, error, info, warn};

use crate::config::{Config, FailurePolicy};
use crate::error::{MapError, RoutingError};
use crate::libraries::fare::FareModel;
use crate::libraries::markers::{
    generate_markers, RandomJitter, ReportedPosition, DEFAULT_JITTER_DEGREES,
};
use crate::libraries::polyline;
use crate::libraries::region::{calculate_region, present};
use crate::models::{Coordinate, Driver, MarkerData, Region, TripEstimate};
use crate::services::routes::{GoogleRoutesClient, RoutingProvider};

/// Turns driver and location data into map state, asking a routing provider
/// for durations and geometry where needed.
pub struct MapService<P> {
    provider: P,
    fare: FareModel,
    failure_policy: FailurePolicy,
    jitter_degrees: f64,
}

impl MapService<GoogleRoutesClient> {
    pub fn from_config(config: &Config) -> Result<Self, RoutingError> {
        let provider = GoogleRoutesClient::from_config(config)?;
        Ok(Self::new(provider)
            .with_fare(FareModel::new(config.fare_rate_per_minute))
            .with_failure_policy(config.failure_policy)
            .with_jitter(config.marker_jitter_degrees))
    }
}

impl<P: RoutingProvider> MapService<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            fare: FareModel::default(),
            failure_policy: FailurePolicy::default(),
            jitter_degrees: DEFAULT_JITTER_DEGREES,
        }
    }

    pub fn with_fare(mut self, fare: FareModel) -> Self {
        self.fare = fare;
        self
    }

    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    pub fn with_jitter(mut self, jitter_degrees: f64) -> Self {
        self.jitter_degrees = jitter_degrees;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Place drivers around the user. Drivers with a reported position are drawn
    /// there; the rest are scattered with the configured jitter.
    pub fn generate_markers(
        &self,
        drivers: &[Driver],
        user_latitude: f64,
        user_longitude: f64,
    ) -> Vec<MarkerData> {
        let mut source = ReportedPosition::new(RandomJitter::new(self.jitter_degrees));
        generate_markers(drivers, user_latitude, user_longitude, &mut source)
    }

    pub fn calculate_region(
        &self,
        user_latitude: Option<f64>,
        user_longitude: Option<f64>,
        destination_latitude: Option<f64>,
        destination_longitude: Option<f64>,
    ) -> Region {
        calculate_region(
            user_latitude,
            user_longitude,
            destination_latitude,
            destination_longitude,
        )
    }

    /// Enrich every marker with pickup time, total trip time and fare.
    ///
    /// Returns `Ok(None)` without touching the network while any of the four
    /// location values is missing. Otherwise both legs of every marker are
    /// requested concurrently and the call completes once all of them have.
    /// The output has the same length and order as `markers`.
    pub async fn estimate_driver_times(
        &self,
        markers: &[MarkerData],
        user_latitude: Option<f64>,
        user_longitude: Option<f64>,
        destination_latitude: Option<f64>,
        destination_longitude: Option<f64>,
    ) -> Result<Option<Vec<MarkerData>>, MapError> {
        let (Some(user_lat), Some(user_lng), Some(dest_lat), Some(dest_lng)) = (
            present(user_latitude),
            present(user_longitude),
            present(destination_latitude),
            present(destination_longitude),
        ) else {
            debug!("Locations not ready, skipping driver time estimation");
            return Ok(None);
        };

        self.provider.ensure_configured().map_err(|e| {
            error!("Cannot estimate driver times: {}", e);
            e
        })?;

        let user = Coordinate::new(user_lat, user_lng);
        let destination = Coordinate::new(dest_lat, dest_lng);

        let pending: Vec<_> = markers
            .iter()
            .map(|marker| self.estimate_marker(marker, user, destination))
            .collect();
        let results = join_all(pending).await;

        let mut enriched = Vec::with_capacity(markers.len());
        let mut failed = 0;

        for (marker, result) in markers.iter().zip(results) {
            match result {
                Ok(estimate) => enriched.push(marker.clone().with_estimate(estimate)),
                Err(e) if self.failure_policy == FailurePolicy::Abort => {
                    error!("Error calculating time for driver {}: {}", marker.id(), e);
                    return Err(e);
                }
                Err(e) => {
                    warn!(
                        "Error calculating time for driver {}, leaving it unpriced: {}",
                        marker.id(),
                        e
                    );
                    failed += 1;
                    enriched.push(MarkerData {
                        estimate: None,
                        ..marker.clone()
                    });
                }
            }
        }

        info!(
            "Estimated times for {} of {} drivers",
            enriched.len() - failed,
            enriched.len()
        );

        Ok(Some(enriched))
    }

    async fn estimate_marker(
        &self,
        marker: &MarkerData,
        user: Coordinate,
        destination: Coordinate,
    ) -> Result<TripEstimate, MapError> {
        let (to_user, to_destination) = tokio::join!(
            self.provider.route_duration(marker.position(), user),
            self.provider.route_duration(user, destination),
        );

        Ok(self.fare.estimate(to_user?, to_destination?))
    }

    /// Fetch and decode the route from origin to destination.
    ///
    /// A response without a polyline is not an error: it is logged and yields an
    /// empty route so the map can still render.
    pub async fn fetch_route(
        &self,
        origin_latitude: f64,
        origin_longitude: f64,
        destination_latitude: f64,
        destination_longitude: f64,
    ) -> Result<Vec<Coordinate>, MapError> {
        self.provider.ensure_configured().map_err(|e| {
            error!("Cannot fetch route: {}", e);
            e
        })?;

        let origin = Coordinate::new(origin_latitude, origin_longitude);
        let destination = Coordinate::new(destination_latitude, destination_longitude);

        let encoded = match self.provider.route_polyline(origin, destination).await {
            Ok(Some(encoded)) => encoded,
            Ok(None) => {
                warn!("No polyline found in response, returning empty route");
                return Ok(Vec::new());
            }
            Err(e) => {
                error!("Error fetching polyline: {}", e);
                return Err(e);
            }
        };

        let route = polyline::decode(&encoded).map_err(|e| {
            error!("Error decoding polyline: {}", e);
            MapError::from(e)
        })?;

        debug!("Decoded route with {} points", route.len());
        Ok(route)
    }
}
