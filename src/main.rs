use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use connect_four_server::config::AppConfig;
use connect_four_server::server;

/// Multiplayer Connect Four session server.
#[derive(Parser)]
#[command(name = "connect-four-server", about = "Run the Connect Four room server")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the listen host
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,

    /// Override the allowed browser origin
    #[arg(long)]
    allowed_origin: Option<String>,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(origin) = cli.allowed_origin {
        config.cors.allowed_origin = origin;
    }
    config.validate().context("validating configuration")?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = config.listen_addr()?;
    let listener = server::bind(addr).await?;
    tracing::info!(
        %addr,
        allowed_origin = %config.cors.allowed_origin,
        "starting Connect Four server"
    );

    server::run(listener, &config.cors.allowed_origin)
        .await
        .context("running server")
}
