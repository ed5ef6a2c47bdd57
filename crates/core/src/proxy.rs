//! Proxy Configuration Types
//!
//! Outbound proxy settings for vendor API calls. The HTTP client factory that
//! consumes them lives in the `interview-prep-llm` crate.

use serde::{Deserialize, Serialize};

/// Proxy protocol type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProxyProtocol {
    Http,
    Https,
    Socks5,
}

impl ProxyProtocol {
    /// Return the URL scheme string for this protocol.
    pub fn scheme(&self) -> &'static str {
        match self {
            ProxyProtocol::Http => "http",
            ProxyProtocol::Https => "https",
            ProxyProtocol::Socks5 => "socks5",
        }
    }
}

/// Proxy configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub protocol: ProxyProtocol,
    pub host: String,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Never written back out when settings are serialized.
    #[serde(skip_serializing, default)]
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Build the proxy URL string (without auth).
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.protocol.scheme(), self.host, self.port)
    }
}
