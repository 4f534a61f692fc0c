//! GeoAddress API Server
//!
//! HTTP API exposing IP location, place lookup and residential address
//! resolution to web clients.

use crate::application::GeoAddressService;
use crate::domain::entities::ResolvedAddress;
use crate::domain::error::GeoError;
use crate::domain::value_objects::{Coordinates, PlaceQuery};
use crate::infrastructure::shutdown::ShutdownController;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Query string of the place lookup endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceParams {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub city: String,
}

impl From<PlaceParams> for PlaceQuery {
    fn from(params: PlaceParams) -> Self {
        PlaceQuery::new(params.country, params.state, params.city)
    }
}

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error body returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// `GeoError` rendered as an HTTP response.
pub struct ApiError(pub GeoError);

impl From<GeoError> for ApiError {
    fn from(err: GeoError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            GeoError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GeoError::NotFound { .. } => StatusCode::NOT_FOUND,
            GeoError::ResolutionFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            GeoError::InvalidUpstreamData(_) | GeoError::Transport { .. } => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!("request failed: {}", self.0.detailed_message());
        }
        let body = ErrorResponse {
            error: self.0.kind().to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// API Server state.
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<GeoAddressService>,
}

/// HTTP API server.
pub struct ApiServer {
    listen_addr: String,
    state: ApiState,
}

impl ApiServer {
    pub fn new(listen_addr: String, service: Arc<GeoAddressService>) -> Self {
        Self {
            listen_addr,
            state: ApiState { service },
        }
    }

    /// Build the router. Exposed for tests.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/api/v1/coordinates/:ip", get(coordinates_handler))
            .route("/api/v1/address/ip/:ip", get(address_for_ip_handler))
            .route("/api/v1/address/me", get(address_for_current_ip_handler))
            .route("/api/v1/address/place", get(address_for_place_handler))
            .route("/api/v1/address/resolve", post(resolve_handler))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Run the API server until `shutdown` fires.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub async fn run(&self, shutdown: ShutdownController) -> anyhow::Result<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.listen_addr).await?;
        tracing::info!("GeoAddress API listening on {}", self.listen_addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;

        tracing::info!("GeoAddress API stopped");
        Ok(())
    }
}

fn parse_ip(raw: &str) -> Result<IpAddr, ApiError> {
    raw.trim()
        .parse::<IpAddr>()
        .map_err(|_| ApiError(GeoError::InvalidInput(format!("not an IP address: {:?}", raw))))
}

// Handler functions

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn coordinates_handler(
    State(state): State<ApiState>,
    Path(ip): Path<String>,
) -> Result<Json<Coordinates>, ApiError> {
    let ip = parse_ip(&ip)?;
    let coords = state.service.locate(&ip.to_string()).await?;
    Ok(Json(coords))
}

async fn address_for_ip_handler(
    State(state): State<ApiState>,
    Path(ip): Path<String>,
) -> Result<Json<ResolvedAddress>, ApiError> {
    let ip = parse_ip(&ip)?;
    let resolved = state.service.address_for_ip(&ip.to_string()).await?;
    Ok(Json(resolved))
}

async fn address_for_current_ip_handler(
    State(state): State<ApiState>,
) -> Result<Json<ResolvedAddress>, ApiError> {
    let resolved = state.service.address_for_current_ip().await?;
    Ok(Json(resolved))
}

async fn address_for_place_handler(
    State(state): State<ApiState>,
    Query(params): Query<PlaceParams>,
) -> Result<Json<ResolvedAddress>, ApiError> {
    let query = PlaceQuery::from(params);
    let resolved = state.service.address_for_place(&query).await?;
    Ok(Json(resolved))
}

async fn resolve_handler(
    State(state): State<ApiState>,
    Json(base): Json<Coordinates>,
) -> Result<Json<ResolvedAddress>, ApiError> {
    let address = state.service.resolve(base).await?;
    Ok(Json(ResolvedAddress::new(base, address)))
}
