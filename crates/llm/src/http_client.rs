//! HTTP Client Factory
//!
//! Builds the `reqwest::Client` shared by a vendor backend, with an explicit
//! request timeout and optional proxy.

use std::time::Duration;

use interview_prep_core::ProxyConfig;

use crate::types::{LlmError, LlmResult};

/// Connect timeout applied to every vendor client.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Build a `reqwest::Client` with the given timeout and proxy configuration.
///
/// - `Some(proxy)` -> route all requests through the proxy
/// - `None` -> explicitly disable proxy (`no_proxy`), ignoring env vars
pub fn build_http_client(
    proxy: Option<&ProxyConfig>,
    timeout: Duration,
) -> LlmResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout));
    match proxy {
        Some(cfg) => {
            let url = cfg.url();
            let mut p = reqwest::Proxy::all(&url).map_err(|e| {
                LlmError::configuration(format!("invalid proxy URL {}: {}", url, e))
            })?;
            if let (Some(u), Some(pw)) = (&cfg.username, &cfg.password) {
                p = p.basic_auth(u, pw);
            }
            builder = builder.proxy(p);
        }
        None => {
            builder = builder.no_proxy();
        }
    }
    builder
        .build()
        .map_err(|e| LlmError::configuration(format!("failed to build HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use interview_prep_core::ProxyProtocol;

    #[test]
    fn test_build_http_client_no_proxy() {
        assert!(build_http_client(None, Duration::from_secs(30)).is_ok());
    }

    #[test]
    fn test_build_http_client_with_proxy() {
        let cfg = ProxyConfig {
            protocol: ProxyProtocol::Http,
            host: "127.0.0.1".to_string(),
            port: 8080,
            username: Some("user".to_string()),
            password: Some("pass".to_string()),
        };
        assert!(build_http_client(Some(&cfg), Duration::from_secs(30)).is_ok());
    }
}
