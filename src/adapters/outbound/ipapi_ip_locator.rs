//! ipapi IP Locator
//!
//! Implements IpLocator using the ipapi.co JSON API.
//!
//! See: https://ipapi.co/api/#complete-location

use super::http::{build_client, endpoint, get_text};
use crate::domain::error::GeoError;
use crate::domain::ports::IpLocator;
use crate::domain::value_objects::Coordinates;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Response from ipapi's `/{ip}/json/` endpoint (only the fields we use).
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    #[serde(default)]
    latitude: Option<serde_json::Value>,
    #[serde(default)]
    longitude: Option<serde_json::Value>,
    /// Set for reserved or unknown addresses
    #[serde(default)]
    error: Option<bool>,
    #[serde(default)]
    reason: Option<String>,
}

/// Configuration for the ipapi connection.
#[derive(Debug, Clone)]
pub struct IpApiConfig {
    /// Base URL (e.g., "https://ipapi.co")
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for IpApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://ipapi.co".to_string(),
            user_agent: crate::config::default_user_agent(),
            timeout: Duration::from_secs(5),
        }
    }
}

/// ipapi-backed IP locator.
///
/// Issues exactly one request per `locate` call.
pub struct IpApiLocator {
    config: IpApiConfig,
    client: reqwest::Client,
}

impl IpApiLocator {
    pub fn new(config: IpApiConfig) -> anyhow::Result<Self> {
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self { config, client })
    }

    /// Turn a decoded response into coordinates.
    fn parse_coordinates(ip: &str, body: &str) -> Result<Coordinates, GeoError> {
        let data: IpApiResponse = serde_json::from_str(body).map_err(|e| {
            GeoError::InvalidUpstreamData(format!("ipapi response for {} is not valid JSON: {}", ip, e))
        })?;

        if data.error.unwrap_or(false) {
            return Err(GeoError::InvalidUpstreamData(format!(
                "ipapi could not locate {}: {}",
                ip,
                data.reason.as_deref().unwrap_or("unknown reason")
            )));
        }

        let latitude = data.latitude.as_ref().and_then(serde_json::Value::as_f64);
        let longitude = data.longitude.as_ref().and_then(serde_json::Value::as_f64);

        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Coordinates::new(latitude, longitude)
                .validate()
                .map_err(|_| {
                    GeoError::InvalidUpstreamData(format!(
                        "ipapi returned out-of-range coordinates for {}: ({}, {})",
                        ip, latitude, longitude
                    ))
                }),
            _ => Err(GeoError::InvalidUpstreamData(format!(
                "ipapi response for {} lacks numeric latitude/longitude",
                ip
            ))),
        }
    }
}

#[async_trait]
impl IpLocator for IpApiLocator {
    async fn locate(&self, ip: &str) -> Result<Coordinates, GeoError> {
        let ip = ip.trim();
        if ip.is_empty() {
            return Err(GeoError::InvalidInput("ip address is empty".to_string()));
        }

        let url = endpoint(&self.config.base_url, &format!("{}/json/", ip));
        let body = get_text(self.client.get(&url), &url).await?;
        let coords = Self::parse_coordinates(ip, &body)?;

        tracing::debug!("ipapi located {} at {}", ip, coords);
        Ok(coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn locator(base_url: String) -> IpApiLocator {
        IpApiLocator::new(IpApiConfig {
            base_url,
            user_agent: "geoaddress-test/1.0".to_string(),
            timeout: Duration::from_millis(500),
        })
        .unwrap()
    }

    // ===== parse_coordinates Tests =====

    #[test]
    fn test_parse_numeric_coordinates() {
        let body = r#"{"ip":"8.8.8.8","city":"Mountain View","latitude":37.42301,"longitude":-122.083352}"#;
        let coords = IpApiLocator::parse_coordinates("8.8.8.8", body).unwrap();
        assert_eq!(coords, Coordinates::new(37.42301, -122.083352));
    }

    #[test]
    fn test_parse_string_coordinates_rejected() {
        let body = r#"{"latitude":"37.4","longitude":"-122.0"}"#;
        let result = IpApiLocator::parse_coordinates("8.8.8.8", body);
        assert!(matches!(result, Err(GeoError::InvalidUpstreamData(_))));
    }

    #[test]
    fn test_parse_missing_longitude_rejected() {
        let body = r#"{"latitude":37.4}"#;
        let result = IpApiLocator::parse_coordinates("8.8.8.8", body);
        assert!(matches!(result, Err(GeoError::InvalidUpstreamData(_))));
    }

    #[test]
    fn test_parse_null_coordinates_rejected() {
        let body = r#"{"latitude":null,"longitude":null}"#;
        let result = IpApiLocator::parse_coordinates("8.8.8.8", body);
        assert!(matches!(result, Err(GeoError::InvalidUpstreamData(_))));
    }

    #[test]
    fn test_parse_reserved_ip_reports_reason() {
        let body = r#"{"ip":"127.0.0.1","error":true,"reason":"Reserved IP Address","reserved":true}"#;
        let err = IpApiLocator::parse_coordinates("127.0.0.1", body).unwrap_err();
        assert!(matches!(err, GeoError::InvalidUpstreamData(_)));
        assert!(err.to_string().contains("Reserved IP Address"));
    }

    #[test]
    fn test_parse_out_of_range_rejected() {
        let body = r#"{"latitude":123.0,"longitude":0.0}"#;
        let result = IpApiLocator::parse_coordinates("8.8.8.8", body);
        assert!(matches!(result, Err(GeoError::InvalidUpstreamData(_))));
    }

    #[test]
    fn test_parse_invalid_json_rejected() {
        let result = IpApiLocator::parse_coordinates("8.8.8.8", "<html>rate limited</html>");
        assert!(matches!(result, Err(GeoError::InvalidUpstreamData(_))));
    }

    // ===== Integration Tests with Mock HTTP Server =====

    #[tokio::test]
    async fn test_locate_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/8.8.8.8/json/"))
            .and(header("user-agent", "geoaddress-test/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ip": "8.8.8.8",
                "latitude": 34.0522,
                "longitude": -118.2437
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let coords = locator(mock_server.uri()).locate("8.8.8.8").await.unwrap();
        assert_eq!(coords, Coordinates::new(34.0522, -118.2437));
    }

    #[tokio::test]
    async fn test_locate_server_error_is_transport() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/8.8.8.8/json/"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = locator(mock_server.uri()).locate("8.8.8.8").await;
        assert!(matches!(result, Err(GeoError::Transport { .. })));
    }

    #[tokio::test]
    async fn test_locate_timeout_is_transport_without_retry() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/8.8.8.8/json/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"latitude": 1.0, "longitude": 2.0}))
                    .set_delay(Duration::from_secs(2)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = locator(mock_server.uri()).locate("8.8.8.8").await;
        assert!(matches!(result, Err(GeoError::Transport { .. })));
    }

    #[tokio::test]
    async fn test_locate_empty_ip_makes_no_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let result = locator(mock_server.uri()).locate("").await;
        assert!(matches!(result, Err(GeoError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_locate_unreachable_is_transport() {
        // Nothing listens on port 1
        let result = locator("http://127.0.0.1:1".to_string()).locate("8.8.8.8").await;
        assert!(matches!(result, Err(GeoError::Transport { .. })));
    }
}
