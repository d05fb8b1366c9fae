//! Knowledge hub HTTP server.

mod routes;
mod server;

use anyhow::Context;
use clap::Parser;
use knowledgehub::{config::Config, service::KnowledgeHub};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "knowledgehub",
    version,
    about = "Retrieval-augmented question answering over department documents"
)]
struct Cli {
    /// Address to bind
    #[arg(long, env = "HUB_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "HUB_PORT", default_value = "8000")]
    port: u16,

    /// Json file overriding models, timeouts and CORS origins
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let mut config = Config::from_env().context("invalid environment configuration")?;
    if let Some(path) = &cli.config {
        config = config
            .merge_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
    }
    tracing::info!(
        embed_model = %config.embed_model,
        chat_model = %config.chat_model,
        dimensions = config.embedding_dimensions,
        configured = config.is_configured(),
        "Configuration loaded"
    );

    let hub = Arc::new(KnowledgeHub::from_config(&config));
    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", cli.host, cli.port))?;

    server::start(hub, &config.cors_origins, addr).await
}
