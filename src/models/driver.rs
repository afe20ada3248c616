use serde::{Deserialize, Serialize};

use super::location::Coordinate;

/// A driver record as served by the drivers table. Read-only to the map layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_seats: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    // Last reported position, when the data source has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_position: Option<Coordinate>,
}

impl Driver {
    pub fn new(id: i64, first_name: &str, last_name: &str) -> Self {
        Self {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            profile_image_url: None,
            car_image_url: None,
            car_seats: None,
            rating: None,
            last_position: None,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Time and fare for one driver: pickup leg plus the trip itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripEstimate {
    /// Total minutes (pickup + trip), rounded to 2 decimals
    pub time: f64,
    /// Whole-unit fare as a decimal string
    pub price: String,
    /// Seconds from the driver to the rider, carried in JSON as a decimal
    /// string (`"754"`)
    #[serde(with = "seconds_string")]
    pub time_to_user: u64,
}

mod seconds_string {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(seconds: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(seconds)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        deserializer.deserialize_any(SecondsVisitor)
    }

    struct SecondsVisitor;

    // Plain integers are accepted as well
    impl<'de> Visitor<'de> for SecondsVisitor {
        type Value = u64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("whole seconds as a string or an integer")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<u64, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<u64, E> {
            u64::try_from(value).map_err(|_| E::custom(format!("negative seconds: {}", value)))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<u64, E> {
            value
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid seconds: {:?}", value)))
        }
    }
}

/// A driver placed on the map. `id` is always the driver's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerData {
    #[serde(flatten)]
    pub driver: Driver,
    pub latitude: f64,
    pub longitude: f64,
    pub title: String,
    #[serde(flatten)]
    pub estimate: Option<TripEstimate>,
}

impl MarkerData {
    pub fn id(&self) -> i64 {
        self.driver.id
    }

    pub fn position(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    pub fn with_estimate(self, estimate: TripEstimate) -> Self {
        Self {
            estimate: Some(estimate),
            ..self
        }
    }
}
