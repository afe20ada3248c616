use crate::models::Region;

/// Where the map opens when the user's position is not known yet
pub const FALLBACK_LATITUDE: f64 = 37.78825;
pub const FALLBACK_LONGITUDE: f64 = -122.4324;

/// City-block zoom used around a single point
pub const DEFAULT_DELTA: f64 = 0.01;

/// Extra span around user + destination so both stay inside the frame
pub const FRAME_PADDING: f64 = 1.3;

/// A location scalar counts as missing when absent, zero or NaN.
///
/// Zero is treated as "not located yet" because that is what the location
/// store holds before the first fix arrives.
pub fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

/// Compute the viewport that frames the user, or the user and a destination.
///
/// * user missing: fixed fallback region
/// * destination missing: centered on the user at city-block zoom
/// * both present: midpoint, span padded by 30% per axis
///
/// Coinciding user and destination produce a zero span; applying a minimum
/// zoom is up to the map surface.
pub fn calculate_region(
    user_latitude: Option<f64>,
    user_longitude: Option<f64>,
    destination_latitude: Option<f64>,
    destination_longitude: Option<f64>,
) -> Region {
    let (Some(user_lat), Some(user_lng)) = (present(user_latitude), present(user_longitude)) else {
        return Region::new(FALLBACK_LATITUDE, FALLBACK_LONGITUDE, DEFAULT_DELTA, DEFAULT_DELTA);
    };

    let (Some(dest_lat), Some(dest_lng)) =
        (present(destination_latitude), present(destination_longitude))
    else {
        return Region::new(user_lat, user_lng, DEFAULT_DELTA, DEFAULT_DELTA);
    };

    let latitude_delta = (user_lat.max(dest_lat) - user_lat.min(dest_lat)) * FRAME_PADDING;
    let longitude_delta = (user_lng.max(dest_lng) - user_lng.min(dest_lng)) * FRAME_PADDING;

    Region::new(
        (user_lat + dest_lat) / 2.0,
        (user_lng + dest_lng) / 2.0,
        latitude_delta,
        longitude_delta,
    )
}
