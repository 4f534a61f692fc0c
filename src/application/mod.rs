//! Application Layer
//!
//! Use cases built on top of the domain ports.

mod address_resolver;
mod events;
mod geoaddress_service;

pub use address_resolver::{AddressResolver, ResolverConfig, ResolverConfigError};
pub use events::{ResolutionEvent, ResolutionEvents, EVENT_CHANNEL_CAPACITY};
pub use geoaddress_service::GeoAddressService;
