//! Outbound HTTP client construction shared by the collector and the Telegram transport

use std::time::Duration;
use thiserror::Error;
use tracing::info;

pub const USER_AGENT: &str = concat!("Sentinel/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum HttpClientError {
    #[error("invalid proxy address '{address}': {source}")]
    Proxy {
        address: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build http client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Accepts `host:port` as well as full URLs; bare addresses are treated as http proxies.
pub fn normalize_proxy(address: &str) -> String {
    let address = address.trim();
    if address.contains("://") {
        address.to_string()
    } else {
        format!("http://{}", address)
    }
}

/// Build a client with a default request timeout and an optional forward proxy.
///
/// Long-poll requests override the timeout per request.
pub fn build_client(
    proxy: Option<&str>,
    timeout: Duration,
) -> Result<reqwest::Client, HttpClientError> {
    let mut builder = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT);

    if let Some(address) = proxy {
        let url = normalize_proxy(address);
        let proxy = reqwest::Proxy::all(&url).map_err(|source| HttpClientError::Proxy {
            address: address.to_string(),
            source,
        })?;
        info!(proxy = %url, "Using forward proxy");
        builder = builder.proxy(proxy);
    }

    Ok(builder.build()?)
}
