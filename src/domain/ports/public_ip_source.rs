//! Public IP Source Port
//!
//! Discovers the public IP address this process is seen from.

use crate::domain::error::GeoError;
use async_trait::async_trait;
use std::net::IpAddr;

#[async_trait]
pub trait PublicIpSource: Send + Sync {
    /// Ask an external echo service for our public IP.
    async fn public_ip(&self) -> Result<IpAddr, GeoError>;
}
