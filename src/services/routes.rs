use std::error::Error;
use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use crate::config::Config;
use crate::error::{ApiErrorPayload, MapError, RoutingError};
use crate::models::Coordinate;

const COMPUTE_ROUTES_PATH: &str = "/directions/v2:computeRoutes";
const DURATION_FIELD_MASK: &str = "routes.duration";
const POLYLINE_FIELD_MASK: &str = "routes.polyline.encodedPolyline";

/// Computes travel duration and geometry between two points.
pub trait RoutingProvider: Send + Sync {
    /// Fails with a configuration error when the provider cannot be used at all.
    /// Checked before any request is issued.
    fn ensure_configured(&self) -> Result<(), MapError>;

    /// Travel time in whole seconds from `origin` to `destination`.
    fn route_duration(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> impl Future<Output = Result<u64, MapError>> + Send;

    /// Encoded polyline of the route, or `None` when the provider found no route.
    fn route_polyline(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> impl Future<Output = Result<Option<String>, MapError>> + Send;
}

#[derive(Debug, Deserialize)]
struct ComputeRoutesResponse {
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Route {
    duration: Option<String>,
    polyline: Option<EncodedPolyline>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EncodedPolyline {
    encoded_polyline: Option<String>,
}

/// Client for the Google Routes API (`directions/v2:computeRoutes`)
pub struct GoogleRoutesClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    travel_mode: String,
}

impl GoogleRoutesClient {
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        travel_mode: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RoutingError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ride-map-service/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            travel_mode: travel_mode.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, RoutingError> {
        Self::new(
            config.api_key().map(str::to_string),
            config.routes_base_url.clone(),
            config.travel_mode.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    async fn compute_routes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        field_mask: &str,
    ) -> Result<ComputeRoutesResponse, MapError> {
        let api_key = self.api_key.as_deref().ok_or_else(MapError::missing_api_key)?;
        let url = format!("{}{}", self.base_url, COMPUTE_ROUTES_PATH);
        let body = json!({
            "origin": {
                "location": {
                    "latLng": { "latitude": origin.latitude, "longitude": origin.longitude }
                }
            },
            "destination": {
                "location": {
                    "latLng": { "latitude": destination.latitude, "longitude": destination.longitude }
                }
            },
            "travelMode": self.travel_mode,
        });

        tracing::debug!(
            "Requesting {} for ({}, {}) -> ({}, {})",
            field_mask,
            origin.latitude,
            origin.longitude,
            destination.latitude,
            destination.longitude
        );

        let response = self
            .client
            .post(&url)
            .header("X-Goog-Api-Key", api_key)
            .header("X-Goog-FieldMask", field_mask)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                // Log full error chain for debugging
                let mut error_msg = format!("Routes API request failed: {}", e);
                let mut source = e.source();
                while let Some(err) = source {
                    error_msg.push_str(&format!("\n  Caused by: {}", err));
                    source = err.source();
                }
                tracing::warn!("{}", error_msg);
                RoutingError::Request(e)
            })?;

        let status = response.status();
        let text = response.text().await.map_err(RoutingError::Request)?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorPayload>(&text) {
                Ok(payload) => payload.error.message,
                Err(_) => text,
            };
            tracing::warn!("Routes API returned HTTP {}: {}", status, message);
            return Err(RoutingError::Api {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!("Failed to parse Routes API response: {}. Body: {}", e, text);
            RoutingError::Parse(e).into()
        })
    }
}

impl RoutingProvider for GoogleRoutesClient {
    fn ensure_configured(&self) -> Result<(), MapError> {
        match self.api_key {
            Some(_) => Ok(()),
            None => Err(MapError::missing_api_key()),
        }
    }

    async fn route_duration(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<u64, MapError> {
        let response = self
            .compute_routes(origin, destination, DURATION_FIELD_MASK)
            .await?;
        let route = response.routes.first().ok_or(RoutingError::NoRoute)?;

        // Zero durations are left out of the response entirely
        match &route.duration {
            Some(duration) => Ok(parse_duration(duration)?),
            None => Ok(0),
        }
    }

    async fn route_polyline(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Option<String>, MapError> {
        let response = self
            .compute_routes(origin, destination, POLYLINE_FIELD_MASK)
            .await?;

        Ok(response
            .routes
            .into_iter()
            .next()
            .and_then(|route| route.polyline)
            .and_then(|polyline| polyline.encoded_polyline)
            .filter(|encoded| !encoded.is_empty()))
    }
}

/// Parse a protobuf JSON duration such as `"754s"` or `"754.5s"` into whole seconds.
pub fn parse_duration(value: &str) -> Result<u64, RoutingError> {
    let seconds = value
        .trim()
        .strip_suffix('s')
        .and_then(|number| number.parse::<f64>().ok())
        .filter(|seconds| seconds.is_finite() && *seconds >= 0.0)
        .ok_or_else(|| RoutingError::InvalidDuration(value.to_string()))?;

    Ok(seconds.trunc() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("754s").unwrap(), 754);
        assert_eq!(parse_duration("0s").unwrap(), 0);
        assert_eq!(parse_duration("12.9s").unwrap(), 12);
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(matches!(parse_duration("754"), Err(RoutingError::InvalidDuration(_))));
        assert!(matches!(parse_duration("-5s"), Err(RoutingError::InvalidDuration(_))));
        assert!(matches!(parse_duration("soon"), Err(RoutingError::InvalidDuration(_))));
    }

    #[test]
    fn test_missing_key_is_a_configuration_error() {
        let client =
            GoogleRoutesClient::new(None, "http://localhost", "DRIVE", Duration::from_secs(1))
                .unwrap();
        assert!(matches!(
            client.ensure_configured(),
            Err(MapError::Configuration(_))
        ));

        let client = GoogleRoutesClient::new(
            Some(String::new()),
            "http://localhost",
            "DRIVE",
            Duration::from_secs(1),
        )
        .unwrap();
        assert!(client.ensure_configured().is_err());
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_any_request() {
        // Nothing listens on port 9; reaching the network would yield a request error instead
        let client =
            GoogleRoutesClient::new(None, "http://127.0.0.1:9", "DRIVE", Duration::from_secs(1))
                .unwrap();
        let origin = Coordinate::new(37.7749, -122.4194);
        let destination = Coordinate::new(37.4419, -122.1430);

        let result = client.route_duration(origin, destination).await;
        assert!(matches!(result, Err(MapError::Configuration(_))));

        let result = client.route_polyline(origin, destination).await;
        assert!(matches!(result, Err(MapError::Configuration(_))));
    }

    #[test]
    fn test_response_parsing() {
        let response: ComputeRoutesResponse = serde_json::from_str(
            r#"{"routes":[{"duration":"120s","polyline":{"encodedPolyline":"_p~iF~ps|U"}}]}"#,
        )
        .unwrap();
        assert_eq!(response.routes.len(), 1);
        assert_eq!(response.routes[0].duration.as_deref(), Some("120s"));

        let empty: ComputeRoutesResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.routes.is_empty());
    }
}
