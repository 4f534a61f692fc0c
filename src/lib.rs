//! GeoAddress Library
//!
//! Resolves an IP address or a place name to a plausible residential postal
//! address near it. The components are exposed here for the binary, the
//! integration tests and library users.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::{AddressResolver, GeoAddressService, ResolutionEvent, ResolverConfig};
pub use config::{load_config, Config};
pub use domain::entities::{Address, ResolvedAddress};
pub use domain::error::GeoError;
pub use domain::ports::{Geocoder, IpLocator, PublicIpSource};
pub use domain::services::{OffsetSampler, ResidentialValidator};
pub use domain::value_objects::{Coordinates, PlaceQuery};
