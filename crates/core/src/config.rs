use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Where the tabular IPO feed comes from.
///
/// The feed is served by an AKTools instance, which exposes AkShare
/// functions as `GET /api/public/<function>` JSON endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// When false the service runs without a data source and every
    /// cache miss fails as unavailable.
    pub enabled: bool,
    pub base_url: String,
    pub endpoint: String,
    /// Request timeout. Unset means the request may wait indefinitely.
    pub timeout_secs: Option<u64>,
    /// Label reported as `source` in calendar responses.
    pub source_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://127.0.0.1:8080".to_string(),
            endpoint: "stock_hk_ipo_get".to_string(),
            timeout_secs: None,
            source_label: "AkShare stock_hk_ipo_get".to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 300 }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl UpstreamConfig {
    /// True when a data source should be constructed from this section.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.enabled && !self.base_url.trim().is_empty()
    }
}
