mod geocoder;
mod ip_locator;
mod public_ip_source;

pub use geocoder::Geocoder;
pub use ip_locator::IpLocator;
pub use public_ip_source::PublicIpSource;
