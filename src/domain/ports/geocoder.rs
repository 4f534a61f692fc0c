//! Geocoder Port
//!
//! Defines the interface for forward (place -> coordinates) and reverse
//! (coordinates -> address) geocoding.

use crate::domain::entities::Address;
use crate::domain::error::GeoError;
use crate::domain::value_objects::{Coordinates, PlaceQuery};
use async_trait::async_trait;

/// Forward and reverse geocoding service.
///
/// This is an outbound port. The address resolver only needs
/// `reverse_geocode`; `forward_geocode` feeds it when the caller starts from
/// a place name instead of an IP.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Find coordinates for a place.
    ///
    /// Implementations try progressively less specific queries (see
    /// [`PlaceQuery::candidates`]) and fail with `NotFound` only when every
    /// one of them came back empty or failed.
    async fn forward_geocode(&self, query: &PlaceQuery) -> Result<Coordinates, GeoError>;

    /// Find the structured address at a point.
    async fn reverse_geocode(&self, coords: Coordinates) -> Result<Address, GeoError>;
}
