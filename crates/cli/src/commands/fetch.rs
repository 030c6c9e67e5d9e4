use hk_ipo_core::ConfigLoader;

/// Forces one upstream fetch and prints the first `limit` items.
pub async fn run_fetch(config_path: &str, limit: usize) -> anyhow::Result<()> {
    let config = ConfigLoader::load_from(config_path)?;
    let calendar = super::build_calendar(&config)?;

    let payload = calendar.get_items(true).await?;
    tracing::info!(
        total = payload.items.len(),
        source = payload.source.as_deref().unwrap_or("-"),
        "Fetched IPO calendar"
    );

    let items: Vec<_> = payload.items.iter().take(limit).collect();
    println!("{}", serde_json::to_string_pretty(&items)?);

    Ok(())
}
