//! Integration tests for the HTTP API
//!
//! Drives the axum router in-process with stub ports behind the service.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use geoaddress::adapters::inbound::ApiServer;
use geoaddress::{
    Address, Coordinates, GeoAddressService, GeoError, Geocoder, IpLocator, PlaceQuery,
    PublicIpSource, ResolverConfig,
};
use http_body_util::BodyExt;
use std::net::IpAddr;
use std::sync::Arc;
use tower::ServiceExt;

// ===== Stub ports =====

struct StubLocator;

#[async_trait]
impl IpLocator for StubLocator {
    async fn locate(&self, ip: &str) -> Result<Coordinates, GeoError> {
        match ip {
            "8.8.8.8" => Ok(Coordinates::new(37.386, -122.0838)),
            "10.0.0.1" => Err(GeoError::InvalidUpstreamData(
                "ipapi could not locate 10.0.0.1: Reserved IP Address".to_string(),
            )),
            _ => Err(GeoError::transport("GET ipapi", "connection refused")),
        }
    }
}

/// Residential everywhere except south of the equator.
struct StubGeocoder;

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn forward_geocode(&self, query: &PlaceQuery) -> Result<Coordinates, GeoError> {
        if query.city == "Paris" {
            Ok(Coordinates::new(48.8566, 2.3522))
        } else {
            Err(GeoError::NotFound {
                query: query.clone(),
            })
        }
    }

    async fn reverse_geocode(&self, coords: Coordinates) -> Result<Address, GeoError> {
        if coords.latitude < 0.0 {
            return Ok(Address {
                country: Some("Antarctica".to_string()),
                ..Address::default()
            });
        }
        Ok(Address {
            house_number: Some("12".to_string()),
            road: Some("Main Street".to_string()),
            city: Some("Springfield".to_string()),
            state: Some("Illinois".to_string()),
            country: Some("United States".to_string()),
            ..Address::default()
        })
    }
}

struct StubPublicIp;

#[async_trait]
impl PublicIpSource for StubPublicIp {
    async fn public_ip(&self) -> Result<IpAddr, GeoError> {
        Ok("8.8.8.8".parse().unwrap())
    }
}

fn app_with(public_ip: Option<Arc<dyn PublicIpSource>>) -> axum::Router {
    let service = GeoAddressService::new(
        Arc::new(StubLocator),
        Arc::new(StubGeocoder),
        public_ip,
        ResolverConfig {
            rng_seed: Some(1),
            ..ResolverConfig::default()
        },
    );
    ApiServer::new("127.0.0.1:0".to_string(), Arc::new(service)).router()
}

fn app() -> axum::Router {
    app_with(Some(Arc::new(StubPublicIp)))
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_coordinates_for_ip() {
    let (status, body) = send(app(), get("/api/v1/coordinates/8.8.8.8")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["latitude"], 37.386);
    assert_eq!(body["longitude"], -122.0838);
}

#[tokio::test]
async fn test_malformed_ip_is_bad_request() {
    let (status, body) = send(app(), get("/api/v1/address/ip/not-an-ip")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_input");
}

#[tokio::test]
async fn test_address_for_ip() {
    let (status, body) = send(app(), get("/api/v1/address/ip/8.8.8.8")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["address"]["house_number"], "12");
    assert_eq!(body["address"]["road"], "Main Street");
    assert!(body["maps_url"]
        .as_str()
        .unwrap()
        .starts_with("https://www.google.com/maps/search/"));
}

#[tokio::test]
async fn test_upstream_failures_are_bad_gateway() {
    let (status, body) = send(app(), get("/api/v1/coordinates/10.0.0.1")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "invalid_upstream_data");

    let (status, body) = send(app(), get("/api/v1/coordinates/192.0.2.1")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "transport_error");
}

#[tokio::test]
async fn test_address_for_current_ip() {
    let (status, body) = send(app(), get("/api/v1/address/me")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["base"]["latitude"], 37.386);
}

#[tokio::test]
async fn test_address_for_current_ip_without_source() {
    let (status, _) = send(app_with(None), get("/api/v1/address/me")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_address_for_place() {
    let (status, body) = send(
        app(),
        get("/api/v1/address/place?country=France&state=Ile-de-France&city=Paris"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["base"]["latitude"], 48.8566);
}

#[tokio::test]
async fn test_unknown_place_is_not_found() {
    let (status, body) = send(
        app(),
        get("/api/v1/address/place?country=Nowhere&state=Nowhere&city=Atlantis"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_incomplete_place_is_bad_request() {
    let (status, _) = send(app(), get("/api/v1/address/place?city=Paris")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_resolve_coordinates() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/address/resolve")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"latitude": 39.78, "longitude": -89.65}"#))
        .unwrap();

    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["address"]["city"], "Springfield");
}

#[tokio::test]
async fn test_resolve_without_residential_result() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/address/resolve")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"latitude": -80.0, "longitude": 0.0}"#))
        .unwrap();

    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "resolution_failed");
}

#[tokio::test]
async fn test_resolve_out_of_range_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/address/resolve")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"latitude": 95.0, "longitude": 0.0}"#))
        .unwrap();

    let (status, _) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
