//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use crate::domain::error::GeoError;
use serde::{Deserialize, Serialize};

/// A point on the globe in decimal degrees.
///
/// The type itself does not enforce the valid range: sampled offsets near
/// the poles or the antimeridian may fall outside it. Use [`Coordinates::validate`]
/// wherever a valid point is required.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude, valid range [-90, 90]
    pub latitude: f64,
    /// Longitude, valid range [-180, 180]
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Both components are finite and inside the geographic range.
    pub fn is_valid(&self) -> bool {
        self.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Return the coordinates unchanged if valid, `InvalidInput` otherwise.
    pub fn validate(self) -> Result<Self, GeoError> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(GeoError::InvalidInput(format!(
                "invalid coordinates: {}",
                self
            )))
        }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// Place description used for forward geocoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceQuery {
    pub country: String,
    pub state: String,
    pub city: String,
}

impl PlaceQuery {
    pub fn new(
        country: impl Into<String>,
        state: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            country: country.into(),
            state: state.into(),
            city: city.into(),
        }
    }

    /// Reject queries with a blank component.
    pub fn validate(&self) -> Result<(), GeoError> {
        let blank: Vec<&str> = [
            ("country", &self.country),
            ("state", &self.state),
            ("city", &self.city),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if blank.is_empty() {
            Ok(())
        } else {
            Err(GeoError::InvalidInput(format!(
                "place query is missing: {}",
                blank.join(", ")
            )))
        }
    }

    /// Free-text queries from most to least specific.
    ///
    /// `"{city},{state},{country}"`, then `"{city},{country}"`, then `"{city}"`.
    /// A city-only query can match a same-named city elsewhere; the order is
    /// kept so the most specific match always wins when it exists.
    pub fn candidates(&self) -> [String; 3] {
        let country = self.country.trim();
        let state = self.state.trim();
        let city = self.city.trim();
        [
            format!("{},{},{}", city, state, country),
            format!("{},{}", city, country),
            city.to_string(),
        ]
    }
}

impl std::fmt::Display for PlaceQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}, {}", self.city, self.state, self.country)
    }
}
