//! Domain Layer
//!
//! Entities, value objects, ports and pure services. Nothing here performs I/O.

pub mod entities;
pub mod error;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Address, AttemptOutcome, ResolutionAttempt, ResolvedAddress};
pub use error::GeoError;
pub use value_objects::{Coordinates, PlaceQuery};
