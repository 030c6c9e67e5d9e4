//! AKTools HTTP client for the AkShare HK IPO table.
//!
//! AKTools wraps AkShare functions as JSON endpoints:
//! `GET {base_url}/api/public/{function}` returns the DataFrame as an array
//! of row objects.
//!
//! # Example
//!
//! ```ignore
//! use hk_ipo_data::{AkToolsClient, AkToolsConfig};
//!
//! let client = AkToolsClient::new(AkToolsConfig::default())?;
//! let table = client.fetch_ipo_table().await?;
//! ```

use async_trait::async_trait;
use hk_ipo_core::table::TableDecodeError;
use hk_ipo_core::{IpoTableSource, RawTable, UpstreamConfig};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_AKTOOLS_URL: &str = "http://127.0.0.1:8080";
pub const HK_IPO_ENDPOINT: &str = "stock_hk_ipo_get";

/// Errors from the AKTools provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from AKTools.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Body was not a table we understand.
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<TableDecodeError> for ProviderError {
    fn from(err: TableDecodeError) -> Self {
        Self::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;

#[derive(Debug, Clone)]
pub struct AkToolsConfig {
    pub base_url: String,
    pub endpoint: String,
    /// `None` leaves the request without a deadline.
    pub timeout_secs: Option<u64>,
}

impl Default for AkToolsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_AKTOOLS_URL.to_string(),
            endpoint: HK_IPO_ENDPOINT.to_string(),
            timeout_secs: None,
        }
    }
}

impl AkToolsConfig {
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

impl From<&UpstreamConfig> for AkToolsConfig {
    fn from(config: &UpstreamConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            endpoint: config.endpoint.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

/// Fetches the IPO table from an AKTools instance.
#[derive(Debug, Clone)]
pub struct AkToolsClient {
    config: AkToolsConfig,
    http: Client,
}

impl AkToolsClient {
    /// Creates a client with the given configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: AkToolsConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;

        Ok(Self { config, http })
    }

    #[must_use]
    pub fn url(&self) -> String {
        format!(
            "{}/api/public/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.endpoint
        )
    }

    /// Fetches and decodes the IPO table.
    ///
    /// # Errors
    /// Returns error on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn fetch_ipo_table(&self) -> Result<Option<RawTable>> {
        let url = self.url();
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        Ok(RawTable::from_json(&body)?)
    }
}

#[async_trait]
impl IpoTableSource for AkToolsClient {
    async fn fetch_table(&self) -> anyhow::Result<Option<RawTable>> {
        Ok(self.fetch_ipo_table().await?)
    }

    fn name(&self) -> &str {
        "aktools"
    }
}
