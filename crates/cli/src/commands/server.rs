use hk_ipo_core::ConfigLoader;
use hk_ipo_web_api::ApiServer;

pub async fn run_server(config_path: &str, addr: Option<&str>) -> anyhow::Result<()> {
    tracing::info!("Starting IPO calendar API with config: {}", config_path);

    let config = ConfigLoader::load_from(config_path)?;
    let calendar = super::build_calendar(&config)?;
    tracing::info!(
        ttl_secs = calendar.ttl().as_secs(),
        "Calendar cache ready"
    );

    let addr = addr.map_or_else(|| config.server.addr(), str::to_string);
    let server = ApiServer::new(calendar);
    server.serve_with_shutdown(&addr, shutdown_signal()).await?;

    tracing::info!("IPO calendar API stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to create SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
