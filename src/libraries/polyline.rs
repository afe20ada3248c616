//! Encoded polyline codec (the format used by Google's Directions and Routes APIs).
//!
//! Each coordinate is stored as a pair of signed deltas from the previous point,
//! scaled by 1e5, zig-zag encoded and split into 5-bit groups, least significant
//! group first. Every group is offset by 63 to land in printable ASCII, and all
//! groups except the last of a value carry the 0x20 continuation bit.

use geo::{HaversineLength, LineString};

use crate::error::PolylineError;
use crate::models::Coordinate;

const PRECISION: f64 = 1e5;
const CHAR_OFFSET: u8 = 63;
const CONTINUATION_BIT: u64 = 0x20;
const CHUNK_MASK: u64 = 0x1f;

/// Decode an encoded polyline into coordinates.
///
/// An empty string decodes to an empty route. Truncated or non-polyline input
/// is rejected instead of being read past its end.
pub fn decode(encoded: &str) -> Result<Vec<Coordinate>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut latitude: i64 = 0;
    let mut longitude: i64 = 0;
    let mut coordinates = Vec::new();

    while index < bytes.len() {
        latitude = accumulate(latitude, bytes, &mut index)?;
        longitude = accumulate(longitude, bytes, &mut index)?;

        coordinates.push(Coordinate::new(
            latitude as f64 / PRECISION,
            longitude as f64 / PRECISION,
        ));
    }

    Ok(coordinates)
}

fn accumulate(total: i64, bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let start = *index;
    let delta = next_delta(bytes, index)?;
    total
        .checked_add(delta)
        .ok_or(PolylineError::Overflow { index: start })
}

fn next_delta(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let start = *index;
    let mut value: u64 = 0;
    let mut shift = 0u32;

    loop {
        let byte = *bytes
            .get(*index)
            .ok_or(PolylineError::Truncated { index: *index })?;
        if !(CHAR_OFFSET..=CHAR_OFFSET + 63).contains(&byte) {
            return Err(PolylineError::InvalidCharacter {
                index: *index,
                byte,
            });
        }
        if shift >= u64::BITS {
            return Err(PolylineError::Overflow { index: start });
        }
        *index += 1;

        let chunk = u64::from(byte - CHAR_OFFSET);
        // Only the low 4 bits of a 13th group still fit in 64
        if shift + 5 > u64::BITS && (chunk & CHUNK_MASK) >> (u64::BITS - shift) != 0 {
            return Err(PolylineError::Overflow { index: start });
        }
        value |= (chunk & CHUNK_MASK) << shift;
        shift += 5;

        if chunk & CONTINUATION_BIT == 0 {
            break;
        }
    }

    let magnitude = (value >> 1) as i64;
    Ok(if value & 1 == 1 { !magnitude } else { magnitude })
}

/// Encode coordinates as a polyline, rounding each axis to 1e-5 degrees.
pub fn encode(coordinates: &[Coordinate]) -> String {
    let mut encoded = String::new();
    let mut previous = (0i64, 0i64);

    for coordinate in coordinates {
        let latitude = (coordinate.latitude * PRECISION).round() as i64;
        let longitude = (coordinate.longitude * PRECISION).round() as i64;

        push_delta(&mut encoded, latitude - previous.0);
        push_delta(&mut encoded, longitude - previous.1);

        previous = (latitude, longitude);
    }

    encoded
}

fn push_delta(out: &mut String, delta: i64) {
    let mut value = if delta < 0 {
        !(delta << 1) as u64
    } else {
        (delta << 1) as u64
    };

    while value >= CONTINUATION_BIT {
        out.push(((CONTINUATION_BIT | (value & CHUNK_MASK)) as u8 + CHAR_OFFSET) as char);
        value >>= 5;
    }
    out.push((value as u8 + CHAR_OFFSET) as char);
}

/// Great-circle length of a route in meters
pub fn route_length_meters(route: &[Coordinate]) -> f64 {
    let line: LineString<f64> = route
        .iter()
        .map(|c| (c.longitude, c.latitude))
        .collect::<Vec<_>>()
        .into();
    line.haversine_length()
}
