mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use qdigest_config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Cannot load config from {}", path.display()))?,
        None => Config::load()?,
    };

    // Initialize tracing; RUST_LOG wins over --log-level and config
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();

    match cli.command {
        cli::Commands::Digest {
            source,
            database,
            skip_collections,
            typeinfo,
            pretty,
        } => {
            commands::digest::handle(
                &config,
                source,
                database,
                skip_collections,
                typeinfo,
                pretty,
            )
            .await
        }
        cli::Commands::Redact {
            document,
            typeinfo,
            pretty,
        } => commands::redact::handle(&config, document, typeinfo, pretty).await,
        cli::Commands::Config(cmd) => commands::config::handle(cmd, &config, cli.config.as_deref()),
    }
}
