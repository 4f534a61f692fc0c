//! Offset Sampler Service
//!
//! Pure domain logic for picking a random point near a base coordinate.

use crate::domain::value_objects::Coordinates;
use rand::Rng;

/// Degrees per kilometre, from the flat approximation 1° ≈ 111 km.
///
/// Rounded up to 0.018 (≈ 2/111) so that `radius_km` spans the full width of
/// the sampling square.
pub const DEGREES_PER_KM: f64 = 0.018;

/// Random offset generator.
///
/// The offset is uniform inside a square of side `radius_km * 0.018` degrees
/// centred on the base point, drawn independently for latitude and
/// longitude. The result is not clamped: near the poles or the antimeridian
/// it can leave the valid coordinate range, and the longitude span shrinks
/// in kilometres as latitude grows.
pub struct OffsetSampler;

impl OffsetSampler {
    /// Sample a point around `base` within `radius_km`.
    ///
    /// Deterministic for a seeded `rng`.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, base: Coordinates, radius_km: f64) -> Coordinates {
        let span = radius_km * DEGREES_PER_KM;
        let lat_offset = (rng.gen::<f64>() - 0.5) * span;
        let lon_offset = (rng.gen::<f64>() - 0.5) * span;

        Coordinates::new(base.latitude + lat_offset, base.longitude + lon_offset)
    }

    /// Largest offset, in degrees, `sample` can apply on either axis.
    pub fn max_offset_degrees(radius_km: f64) -> f64 {
        radius_km * DEGREES_PER_KM / 2.0
    }
}
