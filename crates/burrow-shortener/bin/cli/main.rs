mod cli;

use crate::cli::{Command, CLI};
use burrow_shortener::{Shortener, ShortenerService, ShortenerStore};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = CLI::parse();

    info!(
        data_dir = %config.data_dir.display(),
        block_size = config.block_size,
        min_length = config.min_length,
        "opening burrow dataset"
    );

    let store = ShortenerStore::open(&config.store_settings(), &config.shortener_settings())?;
    let service = ShortenerService::new(store);

    let outcome = run(&service, &config).await;
    let closed = service.shutdown().await;

    println!("{}", outcome?);
    closed?;

    Ok(())
}

async fn run(service: &ShortenerService, config: &CLI) -> anyhow::Result<String> {
    match &config.command {
        Command::Shorten { url } => {
            let code = service.shorten(url).await?;
            Ok(match &config.base_url {
                Some(base_url) => code.to_url(base_url),
                None => code.into_string(),
            })
        }
        Command::Resolve { code } => Ok(service.resolve(code).await?),
    }
}
