//! Residential Validator Service
//!
//! Decides whether a reverse-geocoded address is specific enough to accept.

use crate::domain::entities::Address;

/// Acceptance heuristic for reverse-geocode results.
///
/// An address qualifies when it has a house number, or when it has both a
/// road and a city. Road+city without a house number still counts since
/// OpenStreetMap house-number coverage is sparse in many regions.
pub struct ResidentialValidator;

impl ResidentialValidator {
    pub fn is_residential(address: &Address) -> bool {
        present(&address.house_number) || (present(&address.road) && present(&address.city))
    }
}

/// Some and not blank.
fn present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|value| !value.trim().is_empty())
}
