//! ipify Public IP Source
//!
//! Implements PublicIpSource using the ipify echo service.

use super::http::{build_client, endpoint, get_text};
use crate::domain::error::GeoError;
use crate::domain::ports::PublicIpSource;
use async_trait::async_trait;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct IpifyResponse {
    ip: String,
}

/// ipify-backed public IP discovery.
pub struct IpifyPublicIp {
    base_url: String,
    client: reqwest::Client,
}

impl IpifyPublicIp {
    pub fn new(base_url: impl Into<String>, user_agent: &str, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            base_url: base_url.into(),
            client: build_client(user_agent, timeout)?,
        })
    }
}

#[async_trait]
impl PublicIpSource for IpifyPublicIp {
    async fn public_ip(&self) -> Result<IpAddr, GeoError> {
        let url = endpoint(&self.base_url, "");
        let body = get_text(self.client.get(&url).query(&[("format", "json")]), &url).await?;

        let data: IpifyResponse = serde_json::from_str(&body).map_err(|e| {
            GeoError::InvalidUpstreamData(format!("ipify response is not valid JSON: {}", e))
        })?;

        data.ip.trim().parse::<IpAddr>().map_err(|_| {
            GeoError::InvalidUpstreamData(format!("ipify returned an invalid IP: {:?}", data.ip))
        })
    }
}
