//! Domain Entities - Core business objects
//!
//! These entities represent the core concepts of the geoaddress domain.
//! They never talk to an upstream service.

use crate::domain::value_objects::Coordinates;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const GOOGLE_MAPS_SEARCH: &str = "https://www.google.com/maps/search/";

/// Structured postal address returned by reverse geocoding.
///
/// Partial population is normal; fields beyond the well-known five are kept
/// in `extra` so nothing the upstream returned is lost.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Any other component (postcode, suburb, country_code, ...)
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Address {
    /// Get a component by its upstream name, looking at the named fields first.
    pub fn get(&self, key: &str) -> Option<&str> {
        let named = match key {
            "house_number" => self.house_number.as_deref(),
            "road" => self.road.as_deref(),
            "city" => self.city.as_deref(),
            "state" => self.state.as_deref(),
            "country" => self.country.as_deref(),
            _ => None,
        };
        named.or_else(|| self.extra.get(key).map(String::as_str))
    }

    /// Present, non-blank components in postal order, joined with ", ".
    pub fn display_line(&self) -> String {
        [
            &self.house_number,
            &self.road,
            &self.city,
            &self.state,
            &self.country,
        ]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }

    /// Google Maps search link for this address.
    pub fn google_maps_url(&self) -> String {
        let query = self.display_line();
        match reqwest::Url::parse_with_params(
            GOOGLE_MAPS_SEARCH,
            &[("api", "1"), ("query", query.as_str())],
        ) {
            Ok(url) => url.to_string(),
            // The base URL is a constant, parsing cannot fail
            Err(_) => GOOGLE_MAPS_SEARCH.to_string(),
        }
    }
}

/// Outcome of a single reverse-geocode attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Accepted(Address),
    RejectedNonResidential,
    RejectedTransportError(String),
}

/// One iteration of the resolver's attempt loop.
///
/// Lives only for the duration of a `resolve` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionAttempt {
    /// 1-based attempt number
    pub attempt_index: u32,
    pub radius_km: f64,
    pub sampled: Coordinates,
    pub outcome: AttemptOutcome,
}

impl ResolutionAttempt {
    pub fn is_accepted(&self) -> bool {
        matches!(self.outcome, AttemptOutcome::Accepted(_))
    }

    /// Failure reason, if this attempt failed at the transport or data level.
    pub fn error_reason(&self) -> Option<&str> {
        match &self.outcome {
            AttemptOutcome::RejectedTransportError(reason) => Some(reason),
            _ => None,
        }
    }
}

/// A residential address together with the point it was resolved around.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedAddress {
    pub base: Coordinates,
    pub address: Address,
    pub maps_url: String,
}

impl ResolvedAddress {
    pub fn new(base: Coordinates, address: Address) -> Self {
        let maps_url = address.google_maps_url();
        Self {
            base,
            address,
            maps_url,
        }
    }
}
