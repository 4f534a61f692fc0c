//! IP Locator Port
//!
//! Defines the interface for resolving a public IP address to coordinates.

use crate::domain::error::GeoError;
use crate::domain::value_objects::Coordinates;
use async_trait::async_trait;

/// Resolver for IP address to geographic coordinates.
///
/// This is an outbound port that abstracts the IP-geolocation service.
/// Implementations issue a single request and never retry; retry policy
/// belongs to the caller.
#[async_trait]
pub trait IpLocator: Send + Sync {
    /// Resolve an IP address to coordinates.
    ///
    /// The IP syntax is validated upstream by the caller. Fails with
    /// `InvalidUpstreamData` when the service does not answer with both a
    /// numeric latitude and longitude.
    async fn locate(&self, ip: &str) -> Result<Coordinates, GeoError>;
}
