use std::net::SocketAddr;

const DEFAULT_API_URL: &str = "https://gate.whapi.cloud/messages/text";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

/// Upstream gateway settings. Read once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub endpoint_url: String,
    pub bearer_token: Option<String>,
}

impl GatewayConfig {
    pub fn new(endpoint_url: impl Into<String>, bearer_token: Option<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            bearer_token,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint_url = lookup("WHAPI_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let bearer_token = lookup("WHAPI_TOKEN");
        let host = lookup("WHAPI_RELAY_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = lookup("WHAPI_RELAY_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            gateway: GatewayConfig::new(endpoint_url, bearer_token),
            host,
            port,
        }
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|err| anyhow::anyhow!("invalid bind address {addr}: {err}"))
    }
}
