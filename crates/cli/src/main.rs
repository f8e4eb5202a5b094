//! earthlings-export: one-shot CSV export of the filtered catalog.
//!
//! Fetches every Human + Alive character, keeps those whose origin mentions
//! Earth and writes Name, Location, Image rows to a CSV file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use earthlings_client::{CatalogClient, FetchConfig};
use earthlings_core::{AppConfig, export_csv};

#[derive(Parser, Debug)]
#[command(
    name = "earthlings-export",
    about = "Export Human + Alive characters of Earth origin to CSV"
)]
struct Cli {
    /// Destination CSV file; an existing file is overwritten.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Character listing endpoint of the catalog API.
    #[arg(long)]
    base_url: Option<String>,
}

impl Cli {
    /// Layer command-line overrides on top of the loaded configuration.
    fn apply(self, mut config: AppConfig) -> Result<AppConfig> {
        if let Some(output) = self.output {
            config.export_path = output;
        }
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let config = cli.apply(AppConfig::load()?)?;

    if let Err(err) = export(&config).await {
        tracing::error!(error = %err, "export failed");
        return Err(err);
    }

    Ok(())
}

/// Fetch, filter and write the CSV. Returns the number of rows written.
async fn export(config: &AppConfig) -> Result<usize> {
    let client = CatalogClient::new(FetchConfig::from(config))?;
    let query = config.query();

    tracing::info!("Fetching characters from {}", config.base_url);
    let characters = client
        .fetch_all(&config.base_url, &query.to_params())
        .await
        .context("failed to fetch characters")?;
    tracing::info!("Total characters retrieved ({} + {}): {}", query.species, query.status, characters.len());

    let filtered = config.origin_filter().apply(&characters)?;
    tracing::info!("Characters after {} origin filter: {}", config.origin_contains, filtered.len());

    let rows = export_csv(&filtered, &config.export_path)
        .with_context(|| format!("failed to write {}", config.export_path.display()))?;
    tracing::info!("Saved {} characters to '{}'", rows, config.export_path.display());

    Ok(rows)
}
