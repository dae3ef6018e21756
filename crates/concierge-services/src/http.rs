use std::time::Duration;

use concierge_core::config::ServicesConfig;
use concierge_core::{ConciergeError, Result};

/// Build the shared reqwest client with the configured request timeout.
pub(crate) fn build_client(config: &ServicesConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .map_err(|e| ConciergeError::Config(format!("failed to build HTTP client: {}", e)))
}

/// Attach the service API key, if one is configured.
pub(crate) fn with_api_key(
    req: reqwest::RequestBuilder,
    api_key: Option<&str>,
) -> reqwest::RequestBuilder {
    match api_key {
        Some(key) => req.bearer_auth(key),
        None => req,
    }
}
