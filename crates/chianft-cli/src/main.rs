mod args;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::args::Command;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Command::parse() {
        Command::CreateMintSpendBundles(args) => commands::create(&args).await?,
        Command::SubmitSpendBundles(args) => commands::submit(&args).await?,
    }

    Ok(())
}
