//! geoaddress - IP to residential address service
//!
//! This is the composition root that wires together all the components.

use geoaddress::adapters::inbound::ApiServer;
use geoaddress::adapters::outbound::{IpApiLocator, IpifyPublicIp, NominatimGeocoder};
use geoaddress::config::load_config;
use geoaddress::domain::ports::{Geocoder, IpLocator, PublicIpSource};
use geoaddress::infrastructure::{shutdown_signal, ShutdownController};
use geoaddress::{GeoAddressService, ResolutionEvent};
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    cfg.validate()?;

    tracing::info!(
        "starting geoaddress listen={} ipapi={} nominatim={} attempts={} radii={:?}",
        cfg.listen_addr,
        cfg.ipapi_url,
        cfg.nominatim_url,
        cfg.max_attempts,
        cfg.radius_schedule_km
    );

    // ===== COMPOSITION ROOT =====

    // 1. Outbound adapters
    let ip_locator: Arc<dyn IpLocator> = Arc::new(IpApiLocator::new(cfg.ipapi_config())?);
    let geocoder: Arc<dyn Geocoder> = Arc::new(NominatimGeocoder::new(cfg.nominatim_config())?);
    let public_ip: Arc<dyn PublicIpSource> = Arc::new(IpifyPublicIp::new(
        cfg.public_ip_url.clone(),
        &cfg.user_agent,
        cfg.request_timeout(),
    )?);

    // 2. Application service
    let service = Arc::new(GeoAddressService::new(
        ip_locator,
        geocoder,
        Some(public_ip),
        cfg.resolver_config(),
    ));

    // 3. Resolution log
    let mut events = service.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(ResolutionEvent::Resolved { base, address }) => {
                    tracing::info!("resolved {} near {}", address.display_line(), base);
                }
                Ok(ResolutionEvent::Failed { base, reason }) => {
                    tracing::info!("no address near {}: {}", base, reason);
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("resolution log skipped {} events", n);
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // 4. Shutdown handling
    let shutdown = ShutdownController::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    // 5. Inbound adapter
    let server = ApiServer::new(cfg.listen_addr.clone(), service);
    server.run(shutdown).await
}
