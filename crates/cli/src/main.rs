use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hk-ipo")]
#[command(about = "Hong Kong IPO calendar API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web API server
    Server {
        /// Config file path
        #[arg(short, long, default_value = hk_ipo_core::DEFAULT_CONFIG_PATH)]
        config: String,
        /// Server address, overrides the configured host and port
        #[arg(short, long)]
        addr: Option<String>,
    },
    /// Fetch the calendar once and print normalized items as JSON
    Fetch {
        /// Config file path
        #[arg(short, long, default_value = hk_ipo_core::DEFAULT_CONFIG_PATH)]
        config: String,
        /// Maximum number of items to print
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Server { config, addr } => {
            commands::run_server(&config, addr.as_deref()).await?;
        }
        Commands::Fetch { config, limit } => {
            commands::run_fetch(&config, limit).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_server_defaults() {
        let cli = Cli::try_parse_from(["hk-ipo", "server"]).unwrap();
        match cli.command {
            Commands::Server { config, addr } => {
                assert_eq!(config, "config/Config.toml");
                assert!(addr.is_none());
            }
            Commands::Fetch { .. } => panic!("expected server"),
        }
    }

    #[test]
    fn test_parse_fetch_limit() {
        let cli = Cli::try_parse_from(["hk-ipo", "fetch", "--limit", "5", "-c", "ipo.toml"]).unwrap();
        match cli.command {
            Commands::Fetch { config, limit } => {
                assert_eq!(config, "ipo.toml");
                assert_eq!(limit, 5);
            }
            Commands::Server { .. } => panic!("expected fetch"),
        }
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(Cli::try_parse_from(["hk-ipo", "backtest"]).is_err());
    }
}
