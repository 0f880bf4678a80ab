//! ABI - Autonomous Business Intelligence
//!
//! CLI entry point for the ABI agent.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;
mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let config = app::load_config()?;

    // Logs go to stderr; stdout belongs to the REPL.
    let json = config.logging.json;
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.as_str().into()),
        )
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();

    let cli = cli::Cli::parse();
    if cli.command.is_some() {
        info!("Starting ABI v{}", env!("CARGO_PKG_VERSION"));
    }

    cli::run(cli, config).await
}
