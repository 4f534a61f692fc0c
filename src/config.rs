use crate::adapters::outbound::{IpApiConfig, NominatimConfig};
use crate::application::{ResolverConfig, ResolverConfigError};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_IPAPI_URL: &str = "https://ipapi.co";
const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_PUBLIC_IP_URL: &str = "https://api.ipify.org";
const DEFAULT_ACCEPT_LANGUAGE: &str = "en";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RADIUS_SCHEDULE_KM: [f64; 3] = [1.0, 5.0, 15.0];

/// User-Agent sent to every upstream; Nominatim rejects anonymous clients.
pub fn default_user_agent() -> String {
    format!(
        "geoaddress/{} (+https://github.com/GuooGaii/ip-geoaddress-generator)",
        env!("CARGO_PKG_VERSION")
    )
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // HTTP API
    pub listen_addr: String,
    pub debug: bool,

    // Upstream services
    pub ipapi_url: String,
    pub nominatim_url: String,
    pub public_ip_url: String,
    pub user_agent: String,
    pub accept_language: String,
    pub request_timeout_secs: u64,

    // Residential search
    pub max_attempts: u32,
    pub radius_schedule_km: Vec<f64>,
    pub rng_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            debug: false,
            ipapi_url: DEFAULT_IPAPI_URL.to_string(),
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            public_ip_url: DEFAULT_PUBLIC_IP_URL.to_string(),
            user_agent: default_user_agent(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            radius_schedule_km: DEFAULT_RADIUS_SCHEDULE_KM.to_vec(),
            rng_seed: None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("listen address is empty")]
    EmptyListenAddr,
    #[error("request timeout must be at least 1 second")]
    ZeroTimeout,
    #[error("invalid resolver settings: {0}")]
    Resolver(#[from] ResolverConfigError),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listen_addr.trim().is_empty() {
            return Err(ConfigError::EmptyListenAddr);
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        self.resolver_config().validate()?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            max_attempts: self.max_attempts,
            radius_schedule_km: self.radius_schedule_km.clone(),
            rng_seed: self.rng_seed,
        }
    }

    pub fn ipapi_config(&self) -> IpApiConfig {
        IpApiConfig {
            base_url: self.ipapi_url.clone(),
            user_agent: self.user_agent.clone(),
            timeout: self.request_timeout(),
        }
    }

    pub fn nominatim_config(&self) -> NominatimConfig {
        NominatimConfig {
            base_url: self.nominatim_url.clone(),
            user_agent: self.user_agent.clone(),
            timeout: self.request_timeout(),
            accept_language: self.accept_language.clone(),
        }
    }
}

pub fn load_config() -> anyhow::Result<Config> {
    load_config_from(|key| std::env::var(key).ok())
}

/// Build a `Config` from an arbitrary variable lookup.
pub fn load_config_from<F>(lookup: F) -> anyhow::Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let listen_addr = lookup("GEOADDRESS_LISTEN_ADDR")
        .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());

    let debug = lookup("DEBUG").is_some();

    let ipapi_url = lookup("GEOADDRESS_IPAPI_URL")
        .unwrap_or_else(|| DEFAULT_IPAPI_URL.to_string());

    let nominatim_url = lookup("GEOADDRESS_NOMINATIM_URL")
        .unwrap_or_else(|| DEFAULT_NOMINATIM_URL.to_string());

    let public_ip_url = lookup("GEOADDRESS_PUBLIC_IP_URL")
        .unwrap_or_else(|| DEFAULT_PUBLIC_IP_URL.to_string());

    let user_agent = lookup("GEOADDRESS_USER_AGENT")
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(default_user_agent);

    let accept_language = lookup("GEOADDRESS_ACCEPT_LANGUAGE")
        .unwrap_or_else(|| DEFAULT_ACCEPT_LANGUAGE.to_string());

    let request_timeout_secs = lookup("GEOADDRESS_REQUEST_TIMEOUT_SECS")
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

    let max_attempts = lookup("GEOADDRESS_MAX_ATTEMPTS")
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_MAX_ATTEMPTS);

    let radius_schedule_km = lookup("GEOADDRESS_RADIUS_SCHEDULE_KM")
        .and_then(|v| parse_radius_schedule(&v))
        .unwrap_or_else(|| DEFAULT_RADIUS_SCHEDULE_KM.to_vec());

    let rng_seed = lookup("GEOADDRESS_RNG_SEED").and_then(|v| v.trim().parse().ok());

    Ok(Config {
        listen_addr,
        debug,
        ipapi_url,
        nominatim_url,
        public_ip_url,
        user_agent,
        accept_language,
        request_timeout_secs,
        max_attempts,
        radius_schedule_km,
        rng_seed,
    })
}

/// Comma-separated kilometres, e.g. `1,5,15`. `None` if any entry is not a number.
fn parse_radius_schedule(raw: &str) -> Option<Vec<f64>> {
    raw.split(',')
        .map(|s| s.trim().parse::<f64>().ok())
        .collect()
}
