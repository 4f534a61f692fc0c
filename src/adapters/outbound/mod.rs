mod http;
mod ipapi_ip_locator;
mod ipify_public_ip;
mod nominatim_geocoder;

pub use ipapi_ip_locator::{IpApiConfig, IpApiLocator};
pub use ipify_public_ip::IpifyPublicIp;
pub use nominatim_geocoder::{NominatimConfig, NominatimGeocoder};
