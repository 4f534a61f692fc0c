//! Address Resolver - Residential address search around a point
//!
//! Samples a random point near the base coordinates, reverse-geocodes it and
//! keeps the result only if it looks residential. Each failed attempt widens
//! the search radius until the attempt budget is spent.

use crate::domain::entities::{Address, AttemptOutcome, ResolutionAttempt};
use crate::domain::error::GeoError;
use crate::domain::ports::Geocoder;
use crate::domain::services::{OffsetSampler, ResidentialValidator};
use crate::domain::value_objects::Coordinates;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// Attempt budget and radius schedule for the resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    /// Maximum number of reverse-geocode calls per `resolve`
    pub max_attempts: u32,
    /// Search radius in km for attempt 1, 2, ...; the last entry repeats
    pub radius_schedule_km: Vec<f64>,
    /// Fixed RNG seed, for reproducible sampling
    pub rng_seed: Option<u64>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            radius_schedule_km: vec![1.0, 5.0, 15.0],
            rng_seed: None,
        }
    }
}

impl ResolverConfig {
    /// Radius for a 1-based attempt index.
    pub fn radius_for_attempt(&self, attempt_index: u32) -> f64 {
        let idx = (attempt_index.max(1) - 1) as usize;
        self.radius_schedule_km
            .get(idx)
            .or_else(|| self.radius_schedule_km.last())
            .copied()
            .unwrap_or(0.0)
    }

    /// Check the budget and schedule make sense.
    pub fn validate(&self) -> Result<(), ResolverConfigError> {
        if self.max_attempts == 0 {
            return Err(ResolverConfigError::ZeroAttempts);
        }
        if self.radius_schedule_km.is_empty() {
            return Err(ResolverConfigError::EmptySchedule);
        }
        if let Some(bad) = self
            .radius_schedule_km
            .iter()
            .find(|r| !r.is_finite() || **r < 0.0)
        {
            return Err(ResolverConfigError::InvalidRadius(*bad));
        }
        Ok(())
    }
}

/// Resolver configuration errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolverConfigError {
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,
    #[error("radius schedule is empty")]
    EmptySchedule,
    #[error("invalid search radius: {0} km")]
    InvalidRadius(f64),
}

/// Residential address resolver.
///
/// Runs `Sampling -> Querying -> Validating` once per attempt and ends in
/// `Accepted` (address returned) or `Exhausted` (`ResolutionFailed`).
/// Attempts are strictly sequential since each radius depends on the previous
/// failure. The resolver holds no per-call state, so one instance can serve
/// concurrent `resolve` calls.
pub struct AddressResolver {
    geocoder: Arc<dyn Geocoder>,
    config: ResolverConfig,
}

impl AddressResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>, config: ResolverConfig) -> Self {
        Self { geocoder, config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a residential address near `base`.
    ///
    /// Uses the configured seed if any, fresh entropy otherwise.
    pub async fn resolve(&self, base: Coordinates) -> Result<Address, GeoError> {
        let mut rng = match self.config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.resolve_with_rng(base, &mut rng).await
    }

    /// Resolve a residential address near `base` using the given RNG.
    pub async fn resolve_with_rng<R>(
        &self,
        base: Coordinates,
        rng: &mut R,
    ) -> Result<Address, GeoError>
    where
        R: Rng + Send,
    {
        let base = base.validate()?;
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempts: Vec<ResolutionAttempt> = Vec::with_capacity(max_attempts as usize);

        for attempt_index in 1..=max_attempts {
            // Sampling
            let radius_km = self.config.radius_for_attempt(attempt_index);
            let sampled = OffsetSampler::sample(rng, base, radius_km);
            if !sampled.is_finite() {
                return Err(GeoError::InvalidInput(format!(
                    "sampled coordinates are not finite: {}",
                    sampled
                )));
            }

            // Querying + Validating
            let outcome = match self.geocoder.reverse_geocode(sampled).await {
                Ok(address) if ResidentialValidator::is_residential(&address) => {
                    AttemptOutcome::Accepted(address)
                }
                Ok(_) => AttemptOutcome::RejectedNonResidential,
                Err(e) if e.is_transient() => {
                    AttemptOutcome::RejectedTransportError(e.detailed_message())
                }
                Err(e) => return Err(e),
            };

            let attempt = ResolutionAttempt {
                attempt_index,
                radius_km,
                sampled,
                outcome,
            };

            match &attempt.outcome {
                AttemptOutcome::Accepted(address) => {
                    tracing::debug!(
                        "attempt {}/{} accepted at {} (radius {} km): {}",
                        attempt_index,
                        max_attempts,
                        sampled,
                        radius_km,
                        address.display_line()
                    );
                    return Ok(address.clone());
                }
                AttemptOutcome::RejectedNonResidential => {
                    tracing::debug!(
                        "attempt {}/{} at {} (radius {} km) is not residential",
                        attempt_index,
                        max_attempts,
                        sampled,
                        radius_km
                    );
                }
                AttemptOutcome::RejectedTransportError(reason) => {
                    tracing::warn!(
                        "attempt {}/{} at {} (radius {} km) failed: {}",
                        attempt_index,
                        max_attempts,
                        sampled,
                        radius_km,
                        reason
                    );
                }
            }

            attempts.push(attempt);
        }

        // Exhausted
        let last_error = attempts
            .iter()
            .rev()
            .find_map(|a| a.error_reason().map(str::to_string));
        let radii_km = attempts.iter().map(|a| a.radius_km).collect();

        tracing::warn!(
            "no residential address near {} after {} attempts",
            base,
            attempts.len()
        );

        Err(GeoError::ResolutionFailed {
            attempts: attempts.len() as u32,
            radii_km,
            last_error,
        })
    }
}
