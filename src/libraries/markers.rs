use rand::rngs::ThreadRng;
use rand::Rng;

use crate::models::{Coordinate, Driver, MarkerData};

/// Default half-width of the simulated offset, in degrees (~550m at the equator)
pub const DEFAULT_JITTER_DEGREES: f64 = 0.005;

/// Decides where a driver is drawn on the map.
///
/// There is no live driver GPS feed yet, so the default source scatters drivers
/// around the rider. A real telemetry source can implement this trait without
/// any change to the code that consumes markers.
pub trait DriverPositionSource {
    fn position_for(&mut self, driver: &Driver, user: Coordinate) -> Coordinate;
}

/// Places each driver at the user's position plus an independent uniform offset
/// in `[-half_width, half_width]` degrees on each axis.
///
/// This is a stand-in for real driver positions, not a geolocation source.
pub struct RandomJitter<R: Rng = ThreadRng> {
    rng: R,
    half_width: f64,
}

impl RandomJitter<ThreadRng> {
    pub fn new(half_width: f64) -> Self {
        Self::with_rng(rand::thread_rng(), half_width)
    }
}

impl Default for RandomJitter<ThreadRng> {
    fn default() -> Self {
        Self::new(DEFAULT_JITTER_DEGREES)
    }
}

impl<R: Rng> RandomJitter<R> {
    /// A non-finite `half_width` falls back to [`DEFAULT_JITTER_DEGREES`].
    pub fn with_rng(rng: R, half_width: f64) -> Self {
        let half_width = if half_width.is_finite() {
            half_width.abs()
        } else {
            DEFAULT_JITTER_DEGREES
        };
        Self { rng, half_width }
    }

    fn offset(&mut self) -> f64 {
        self.rng.gen_range(-self.half_width..=self.half_width)
    }
}

impl<R: Rng> DriverPositionSource for RandomJitter<R> {
    fn position_for(&mut self, _driver: &Driver, user: Coordinate) -> Coordinate {
        let lat_offset = self.offset();
        let lng_offset = self.offset();
        Coordinate::new(user.latitude + lat_offset, user.longitude + lng_offset)
    }
}

/// Uses the driver's last reported position when the record has one,
/// otherwise defers to `fallback`.
pub struct ReportedPosition<S> {
    fallback: S,
}

impl<S: DriverPositionSource> ReportedPosition<S> {
    pub fn new(fallback: S) -> Self {
        Self { fallback }
    }
}

impl<S: DriverPositionSource> DriverPositionSource for ReportedPosition<S> {
    fn position_for(&mut self, driver: &Driver, user: Coordinate) -> Coordinate {
        match driver.last_position {
            Some(position) => position,
            None => self.fallback.position_for(driver, user),
        }
    }
}

/// Turn driver records into map markers around the user.
///
/// One marker per driver, in input order, carrying the driver's id unchanged.
/// Ids are neither deduplicated nor validated. The user coordinates must be
/// finite; guarding that is the caller's job.
pub fn generate_markers<S: DriverPositionSource + ?Sized>(
    drivers: &[Driver],
    user_latitude: f64,
    user_longitude: f64,
    source: &mut S,
) -> Vec<MarkerData> {
    let user = Coordinate::new(user_latitude, user_longitude);

    drivers
        .iter()
        .map(|driver| {
            let position = source.position_for(driver, user);
            MarkerData {
                driver: driver.clone(),
                latitude: position.latitude,
                longitude: position.longitude,
                title: driver.display_name(),
                estimate: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_drivers() -> Vec<Driver> {
        vec![
            Driver::new(1, "James", "Wilson"),
            Driver::new(2, "David", "Brown"),
            Driver::new(3, "Michael", "Johnson"),
            Driver::new(4, "Robert", "Green"),
        ]
    }

    #[test]
    fn test_one_marker_per_driver_in_order() {
        let drivers = sample_drivers();
        let mut source = RandomJitter::with_rng(StdRng::seed_from_u64(7), DEFAULT_JITTER_DEGREES);

        let markers = generate_markers(&drivers, 37.7749, -122.4194, &mut source);

        assert_eq!(markers.len(), drivers.len());
        for (marker, driver) in markers.iter().zip(&drivers) {
            assert_eq!(marker.id(), driver.id);
            assert_eq!(marker.title, driver.display_name());
            assert!(marker.estimate.is_none());
        }
    }

    #[test]
    fn test_offsets_stay_within_jitter() {
        let drivers: Vec<Driver> = (0..500).map(|id| Driver::new(id, "A", "B")).collect();
        let mut source = RandomJitter::with_rng(StdRng::seed_from_u64(42), DEFAULT_JITTER_DEGREES);

        let markers = generate_markers(&drivers, 40.7128, -74.0060, &mut source);

        for marker in &markers {
            assert!((marker.latitude - 40.7128).abs() <= DEFAULT_JITTER_DEGREES + 1e-12);
            assert!((marker.longitude - -74.0060).abs() <= DEFAULT_JITTER_DEGREES + 1e-12);
        }

        // Offsets should actually vary
        let unique = markers
            .iter()
            .map(|m| m.latitude.to_bits())
            .collect::<std::collections::HashSet<_>>()
            .len();
        assert!(unique > 250);
    }

    #[test]
    fn test_non_finite_jitter_uses_default() {
        let drivers: Vec<Driver> = (0..50).map(|id| Driver::new(id, "A", "B")).collect();

        for half_width in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut source = RandomJitter::with_rng(StdRng::seed_from_u64(3), half_width);
            let markers = generate_markers(&drivers, 10.0, 20.0, &mut source);

            assert_eq!(markers.len(), drivers.len());
            for marker in &markers {
                assert!((marker.latitude - 10.0).abs() <= DEFAULT_JITTER_DEGREES + 1e-12);
                assert!((marker.longitude - 20.0).abs() <= DEFAULT_JITTER_DEGREES + 1e-12);
            }
        }
    }

    #[test]
    fn test_empty_driver_list() {
        let markers = generate_markers(&[], 1.0, 1.0, &mut RandomJitter::default());
        assert!(markers.is_empty());
    }

    #[test]
    fn test_duplicate_ids_are_kept() {
        let drivers = vec![Driver::new(9, "A", "B"), Driver::new(9, "C", "D")];
        let markers = generate_markers(&drivers, 1.0, 1.0, &mut RandomJitter::default());
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].id(), 9);
        assert_eq!(markers[1].id(), 9);
        assert_eq!(markers[1].title, "C D");
    }

    #[test]
    fn test_zero_jitter_places_drivers_on_user() {
        let mut source = RandomJitter::with_rng(StdRng::seed_from_u64(1), 0.0);
        let markers = generate_markers(&sample_drivers(), 10.0, 20.0, &mut source);
        assert!(markers.iter().all(|m| m.latitude == 10.0 && m.longitude == 20.0));
    }

    #[test]
    fn test_reported_position_preferred_over_jitter() {
        let mut drivers = sample_drivers();
        drivers[1].last_position = Some(Coordinate::new(51.5, -0.12));

        let mut source =
            ReportedPosition::new(RandomJitter::with_rng(StdRng::seed_from_u64(3), 0.0));
        let markers = generate_markers(&drivers, 10.0, 20.0, &mut source);

        assert_eq!(markers[0].position(), Coordinate::new(10.0, 20.0));
        assert_eq!(markers[1].position(), Coordinate::new(51.5, -0.12));
        assert_eq!(markers[2].position(), Coordinate::new(10.0, 20.0));
    }
}
