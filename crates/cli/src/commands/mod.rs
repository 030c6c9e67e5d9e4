mod fetch;
mod server;

pub use fetch::run_fetch;
pub use server::run_server;

use hk_ipo_core::{AppConfig, IpoTableSource};
use hk_ipo_data::{AkToolsClient, AkToolsConfig, IpoCalendar};
use std::sync::Arc;

/// Builds the calendar from config. Without a configured upstream the
/// calendar has no source and reports itself unavailable on every miss.
pub fn build_calendar(config: &AppConfig) -> anyhow::Result<Arc<IpoCalendar>> {
    let source: Option<Arc<dyn IpoTableSource>> = if config.upstream.is_configured() {
        let client = AkToolsClient::new(AkToolsConfig::from(&config.upstream))?;
        tracing::info!("Using AKTools upstream at {}", client.url());
        Some(Arc::new(client))
    } else {
        tracing::warn!("No upstream configured; /api/ipo will report the data source as unavailable");
        None
    };

    Ok(Arc::new(IpoCalendar::new(
        source,
        config.upstream.source_label.clone(),
        &config.cache,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_calendar_without_upstream() {
        let mut config = AppConfig::default();
        config.upstream.enabled = false;

        let calendar = build_calendar(&config).unwrap();
        assert!(calendar.get_items(false).await.is_err());
        assert_eq!(calendar.ttl().as_secs(), 300);
    }

    #[test]
    fn test_build_calendar_with_upstream() {
        let config = AppConfig::default();
        let calendar = build_calendar(&config).unwrap();
        assert_eq!(calendar.source_label(), "AkShare stock_hk_ipo_get");
    }
}
