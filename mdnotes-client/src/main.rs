use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use clap::Parser;
use mdnotes_client::api::{DEFAULT_API_URL, HttpNotesApi};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "mdnotes", version, about = "Markdown notes in the terminal")]
struct Cli {
    /// Base URL of the notes collection.
    #[arg(long, env = "MDNOTES_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Write logs to this file. The terminal is owned by the UI, so nothing
    /// is logged unless this is set.
    #[arg(long, env = "MDNOTES_CLIENT_LOG")]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let api = HttpNotesApi::new(&cli.api_url).context("failed to build HTTP client")?;
    tracing::info!("Using notes API at {}", api.base_url());

    mdnotes_client::app::run(&api).await
}
