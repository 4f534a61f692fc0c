//! Nominatim Geocoder
//!
//! Implements Geocoder using the OpenStreetMap Nominatim HTTP API.
//! The public instance requires a descriptive User-Agent on every request.
//!
//! See: https://nominatim.org/release-docs/latest/api/Overview/

use super::http::{build_client, endpoint, get_text};
use crate::domain::entities::Address;
use crate::domain::error::GeoError;
use crate::domain::ports::Geocoder;
use crate::domain::value_objects::{Coordinates, PlaceQuery};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One hit of `/search`. Nominatim encodes coordinates as strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: CoordinateValue,
    lon: CoordinateValue,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CoordinateValue {
    Number(f64),
    Text(String),
}

impl CoordinateValue {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Response from `/reverse`. Failures come back as `{"error": "..."}`.
#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Option<Address>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct SearchParams<'a> {
    q: &'a str,
    format: &'a str,
    limit: u8,
}

#[derive(Debug, Serialize)]
struct ReverseParams<'a> {
    lat: f64,
    lon: f64,
    format: &'a str,
    addressdetails: u8,
    #[serde(rename = "accept-language")]
    accept_language: &'a str,
}

/// Configuration for the Nominatim connection.
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// Base URL (e.g., "https://nominatim.openstreetmap.org")
    pub base_url: String,
    /// Descriptive client identifier, required by the usage policy
    pub user_agent: String,
    /// Timeout applied to each request independently
    pub timeout: Duration,
    /// Preferred language for address components
    pub accept_language: String,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: crate::config::default_user_agent(),
            timeout: Duration::from_secs(5),
            accept_language: "en".to_string(),
        }
    }
}

/// Nominatim-backed geocoder.
pub struct NominatimGeocoder {
    config: NominatimConfig,
    client: reqwest::Client,
}

impl NominatimGeocoder {
    pub fn new(config: NominatimConfig) -> anyhow::Result<Self> {
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self { config, client })
    }

    /// Run one free-text search. `Ok(None)` means an empty result set.
    async fn search(&self, q: &str) -> Result<Option<Coordinates>, GeoError> {
        let url = endpoint(&self.config.base_url, "search");
        let params = SearchParams {
            q,
            format: "json",
            limit: 1,
        };
        let body = get_text(self.client.get(&url).query(&params), &url).await?;

        let hits: Vec<SearchHit> = serde_json::from_str(&body).map_err(|e| {
            GeoError::InvalidUpstreamData(format!("search response is not a result list: {}", e))
        })?;

        let Some(hit) = hits.first() else {
            return Ok(None);
        };

        match (hit.lat.as_f64(), hit.lon.as_f64()) {
            (Some(lat), Some(lon)) => Coordinates::new(lat, lon)
                .validate()
                .map(Some)
                .map_err(|_| {
                    GeoError::InvalidUpstreamData(format!(
                        "search returned out-of-range coordinates ({}, {})",
                        lat, lon
                    ))
                }),
            _ => Err(GeoError::InvalidUpstreamData(format!(
                "search hit has unparseable coordinates: {:?}",
                hit
            ))),
        }
    }

    fn parse_reverse(coords: Coordinates, body: &str) -> Result<Address, GeoError> {
        let data: ReverseResponse = serde_json::from_str(body).map_err(|e| {
            GeoError::InvalidUpstreamData(format!("reverse response for {} is not valid JSON: {}", coords, e))
        })?;

        match (data.address, data.error) {
            (Some(address), _) => Ok(address),
            (None, Some(error)) => Err(GeoError::InvalidUpstreamData(format!(
                "reverse geocoding {} failed: {}",
                coords, error
            ))),
            (None, None) => Err(GeoError::InvalidUpstreamData(format!(
                "reverse response for {} has no address",
                coords
            ))),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn forward_geocode(&self, query: &PlaceQuery) -> Result<Coordinates, GeoError> {
        query.validate()?;

        for candidate in query.candidates() {
            match self.search(&candidate).await {
                Ok(Some(coords)) => {
                    tracing::debug!("forward geocode {:?} -> {}", candidate, coords);
                    return Ok(coords);
                }
                Ok(None) => {
                    tracing::warn!("forward geocode {:?} tried and failed: no match", candidate);
                }
                Err(e) => {
                    tracing::warn!(
                        "forward geocode {:?} tried and failed: {}",
                        candidate,
                        e.detailed_message()
                    );
                }
            }
        }

        Err(GeoError::NotFound {
            query: query.clone(),
        })
    }

    async fn reverse_geocode(&self, coords: Coordinates) -> Result<Address, GeoError> {
        let url = endpoint(&self.config.base_url, "reverse");
        let params = ReverseParams {
            lat: coords.latitude,
            lon: coords.longitude,
            format: "json",
            addressdetails: 1,
            accept_language: &self.config.accept_language,
        };
        let body = get_text(self.client.get(&url).query(&params), &url).await?;

        Self::parse_reverse(coords, &body)
    }
}
