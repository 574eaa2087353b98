//! One-shot fetch + extract against the configured homepage; prints the JSON array.

use anyhow::{Context, Result};
use clap::Parser;
use common::Config;
use std::path::PathBuf;
use std::sync::Arc;

use timestories::extract::Extractor;
use timestories::fetch::HttpFetcher;
use timestories::stories::StoryService;

#[derive(Parser, Debug)]
#[command(name = "fetch_stories", about = "Fetch the homepage once and print the extracted stories")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Extraction backend (dom or scan)
    #[arg(long)]
    strategy: Option<String>,

    /// Maximum number of stories
    #[arg(long)]
    limit: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref()).await?;
    if let Some(strategy) = args.strategy {
        config.extraction.strategy = strategy.parse()?;
    }
    if let Some(limit) = args.limit {
        config.extraction.limit = limit;
    }

    let fetcher = HttpFetcher::new(&config.source)?;
    let extractor = Extractor::from_config(&config)?;
    let service = StoryService::new(Arc::new(fetcher), extractor);

    let stories = service
        .latest()
        .await
        .with_context(|| format!("failed to get stories from {}", config.source.base_url))?;

    println!("{}", serde_json::to_string_pretty(&stories)?);
    Ok(())
}
