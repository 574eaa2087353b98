/*
timestories - single-binary main.rs
This binary loads configuration and starts the Rocket HTTP server.
*/

use anyhow::{Context, Result};
use clap::Parser;
use common::Config;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use timestories::extract::Extractor;
use timestories::fetch::HttpFetcher;
use timestories::server::{launch_rocket, AppState};
use timestories::stories::StoryService;

#[derive(Parser, Debug)]
#[command(name = "timestories", about = "Serve the latest homepage stories as JSON")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long)]
    bind: Option<String>,

    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let mut config = match Config::load(args.config.as_deref()).await {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "failed to load configuration");
            return Err(e);
        }
    };
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    info!(
        base_url = %config.source.base_url,
        limit = config.extraction.limit,
        strategy = %config.extraction.strategy,
        "configuration loaded"
    );

    let fetcher = HttpFetcher::new(&config.source)?;
    let extractor = Extractor::from_config(&config).context("failed to build extractor")?;
    let state = AppState {
        stories: StoryService::new(Arc::new(fetcher), extractor),
    };

    launch_rocket(state, &config.server).await
}
