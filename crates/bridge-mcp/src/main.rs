//! Entry point: load configuration, wire up the bridge, serve stdio.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use bridge_core::{BridgeConfig, HttpBridge};
use bridge_mcp::server::BridgeServer;

/// Default configuration file path.
pub const DEFAULT_CONFIG_FILE: &str = "bridge_config.json";

#[derive(Parser)]
#[command(name = "bridge-mcp")]
#[command(about = "MCP stdio server exposing a controlled HTTP fetch tool")]
#[command(version)]
struct Cli {
    /// Path to the configuration file (absent file means built-in defaults)
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the protocol stream.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = BridgeConfig::load_from_file(&cli.config)
        .with_context(|| format!("loading configuration from '{}'", cli.config.display()))?;
    let bridge = HttpBridge::new(&config).context("building the HTTP bridge")?;

    info!("Starting HTTP bridge MCP server");
    info!("Allowed domains: {:?}", bridge.allowlist().pattern_strings());

    let server = BridgeServer::new(bridge);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    server.serve(stdin, stdout).await.context("serving stdio")?;

    Ok(())
}
