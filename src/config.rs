use serde::Deserialize;

/// What the driver time estimator does when one driver's routing requests fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Keep the marker without an estimate and carry on with the others.
    #[default]
    Isolate,
    /// Fail the whole batch on the first failing driver.
    Abort,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    // Routes API credential. The mobile client ships it as EXPO_PUBLIC_GOOGLE_MAPS_API
    #[serde(default, alias = "expo_public_google_maps_api")]
    pub google_maps_api_key: Option<String>,

    #[serde(default = "default_routes_base_url")]
    pub routes_base_url: String,

    #[serde(default = "default_travel_mode")]
    pub travel_mode: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    // Fare charged per minute of total trip time
    #[serde(default = "default_fare_rate_per_minute")]
    pub fare_rate_per_minute: f64,

    // Half-width in degrees of the simulated driver offset
    #[serde(default = "default_marker_jitter_degrees")]
    pub marker_jitter_degrees: f64,

    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env::<Config>()?.validate()
    }

    /// Reject numeric settings that would poison every computation using them.
    pub fn validate(self) -> Result<Self, envy::Error> {
        if !self.marker_jitter_degrees.is_finite() {
            return Err(envy::Error::Custom(format!(
                "MARKER_JITTER_DEGREES must be a finite number, got {}",
                self.marker_jitter_degrees
            )));
        }
        if !self.fare_rate_per_minute.is_finite() || self.fare_rate_per_minute < 0.0 {
            return Err(envy::Error::Custom(format!(
                "FARE_RATE_PER_MINUTE must be a finite, non-negative number, got {}",
                self.fare_rate_per_minute
            )));
        }
        Ok(self)
    }

    /// The API key, if one is configured and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.google_maps_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            google_maps_api_key: None, // Must be provided via environment
            routes_base_url: default_routes_base_url(),
            travel_mode: default_travel_mode(),
            request_timeout_secs: default_request_timeout_secs(),
            fare_rate_per_minute: default_fare_rate_per_minute(),
            marker_jitter_degrees: default_marker_jitter_degrees(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_routes_base_url() -> String {
    "https://routes.googleapis.com".to_string()
}

fn default_travel_mode() -> String {
    "DRIVE".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_fare_rate_per_minute() -> f64 {
    12.0
}

fn default_marker_jitter_degrees() -> f64 {
    0.005
}
