//! Shared HTTP client construction for the outbound adapters.

use crate::domain::error::GeoError;
use std::time::Duration;

/// Build a client that identifies itself and bounds every request.
pub(crate) fn build_client(user_agent: &str, timeout: Duration) -> anyhow::Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Join a base URL and a path without doubling the slash.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Send a prepared GET request and return the body of a 2xx response.
///
/// Network failures, timeouts and non-success statuses all become
/// `GeoError::Transport` carrying the reqwest error.
pub(crate) async fn get_text(request: reqwest::RequestBuilder, url: &str) -> Result<String, GeoError> {
    let context = format!("GET {}", url);
    let response = request
        .send()
        .await
        .map_err(|e| GeoError::transport(context.clone(), e))?;
    let response = response
        .error_for_status()
        .map_err(|e| GeoError::transport(context.clone(), e))?;
    response
        .text()
        .await
        .map_err(|e| GeoError::transport(context, e))
}
