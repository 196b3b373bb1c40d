//! Naskh - a replicated key-value store
//!
//! One primary accepts writes and pushes them to replicas; replicas serve
//! local reads only.

use clap::Parser;
use naskh_api::Server;
use naskh_core::config::parse_url_list;
use naskh_core::{NodeConfig, NodeRole};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "naskh")]
#[command(version = naskh_core::VERSION)]
#[command(about = "Replicated key-value store node", long_about = None)]
struct Cli {
    /// Node role (primary or replica)
    #[arg(long, env = "NASKH_ROLE")]
    role: Option<NodeRole>,

    /// Bind address
    #[arg(long, env = "NASKH_BIND_ADDRESS")]
    bind: Option<String>,

    /// Port number
    #[arg(short, long, env = "NASKH_PORT")]
    port: Option<u16>,

    /// Data directory
    #[arg(long, env = "NASKH_DATA_DIR")]
    data_dir: Option<String>,

    /// Comma-separated replica base URLs (primary only)
    #[arg(long, env = "NASKH_REPLICA_URLS")]
    replica_urls: Option<String>,

    /// Base URL of the primary (replicas only)
    #[arg(long, env = "NASKH_PRIMARY_URL")]
    primary_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "NASKH_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();

    let mut config = NodeConfig::from_env();

    // CLI flags override environment
    if let Some(role) = cli.role {
        config.role = role;
    }
    if let Some(bind) = cli.bind {
        config.bind_address = bind;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir.into();
    }
    if let Some(urls) = cli.replica_urls {
        config.replica_urls = parse_url_list(&urls);
    }
    if let Some(url) = cli.primary_url {
        config.primary_url = Some(url);
    }

    Server::new(config).run().await?;
    Ok(())
}
