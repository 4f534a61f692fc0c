//! GeoAddress Service - Main application use case
//!
//! Chains IP location or forward geocoding with the address resolver and
//! publishes the outcome. This is the primary interface for the inbound adapter.

use crate::application::address_resolver::{AddressResolver, ResolverConfig};
use crate::application::events::{ResolutionEvent, ResolutionEvents};
use crate::domain::entities::{Address, ResolvedAddress};
use crate::domain::error::GeoError;
use crate::domain::ports::{Geocoder, IpLocator, PublicIpSource};
use crate::domain::value_objects::{Coordinates, PlaceQuery};
use std::sync::Arc;
use tokio::sync::broadcast;

/// GeoAddress service - main application use case.
///
/// This service orchestrates:
/// 1. Finding base coordinates (IP lookup or place lookup)
/// 2. Resolving a residential address around them
/// 3. Publishing a `ResolutionEvent` for every resolution
pub struct GeoAddressService {
    ip_locator: Arc<dyn IpLocator>,
    geocoder: Arc<dyn Geocoder>,
    public_ip: Option<Arc<dyn PublicIpSource>>,
    resolver: AddressResolver,
    events: ResolutionEvents,
}

impl GeoAddressService {
    /// Create a new service.
    pub fn new(
        ip_locator: Arc<dyn IpLocator>,
        geocoder: Arc<dyn Geocoder>,
        public_ip: Option<Arc<dyn PublicIpSource>>,
        resolver_config: ResolverConfig,
    ) -> Self {
        Self {
            ip_locator,
            resolver: AddressResolver::new(geocoder.clone(), resolver_config),
            geocoder,
            public_ip,
            events: ResolutionEvents::default(),
        }
    }

    /// Subscribe to resolution outcomes.
    pub fn subscribe(&self) -> broadcast::Receiver<ResolutionEvent> {
        self.events.subscribe()
    }

    pub fn resolver_config(&self) -> &ResolverConfig {
        self.resolver.config()
    }

    /// Resolve an IP address to coordinates.
    pub async fn locate(&self, ip: &str) -> Result<Coordinates, GeoError> {
        let ip = ip.trim();
        if ip.is_empty() {
            return Err(GeoError::InvalidInput("ip address is empty".to_string()));
        }
        self.ip_locator.locate(ip).await
    }

    /// Resolve a place to coordinates.
    pub async fn forward_geocode(&self, query: &PlaceQuery) -> Result<Coordinates, GeoError> {
        query.validate()?;
        self.geocoder.forward_geocode(query).await
    }

    /// Resolve a residential address around `base` and publish the outcome.
    pub async fn resolve(&self, base: Coordinates) -> Result<Address, GeoError> {
        let result = self.resolver.resolve(base).await;

        let event = match &result {
            Ok(address) => {
                tracing::info!("resolved {} -> {}", base, address.display_line());
                ResolutionEvent::Resolved {
                    base,
                    address: address.clone(),
                }
            }
            Err(e) => ResolutionEvent::Failed {
                base,
                reason: e.to_string(),
            },
        };
        self.events.publish(event);

        result
    }

    /// IP -> coordinates -> residential address.
    pub async fn address_for_ip(&self, ip: &str) -> Result<ResolvedAddress, GeoError> {
        let base = self.locate(ip).await?;
        tracing::debug!("ip {} located at {}", ip, base);
        let address = self.resolve(base).await?;
        Ok(ResolvedAddress::new(base, address))
    }

    /// Place -> coordinates -> residential address.
    pub async fn address_for_place(
        &self,
        query: &PlaceQuery,
    ) -> Result<ResolvedAddress, GeoError> {
        let base = self.forward_geocode(query).await?;
        tracing::debug!("place {} located at {}", query, base);
        let address = self.resolve(base).await?;
        Ok(ResolvedAddress::new(base, address))
    }

    /// Our own public IP -> coordinates -> residential address.
    pub async fn address_for_current_ip(&self) -> Result<ResolvedAddress, GeoError> {
        let source = self.public_ip.as_ref().ok_or_else(|| {
            GeoError::InvalidInput("public IP discovery is not configured".to_string())
        })?;
        let ip = source.public_ip().await?;
        tracing::debug!("public IP detected: {}", ip);
        self.address_for_ip(&ip.to_string()).await
    }
}
