//! carprice - Main Entry Point
//!
//! Used-car price estimator with CLI and server modes.

use clap::Parser;
use carprice::cli::{cmd_encode, cmd_interactive, cmd_options, cmd_predict, cmd_serve, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carprice=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Predict { listing, json }) => {
            cmd_predict(&cli.artifacts, cli.reference_year, listing.into(), json)?;
        }
        Some(Commands::Encode { listing }) => {
            cmd_encode(&cli.artifacts, cli.reference_year, listing.into())?;
        }
        Some(Commands::Options { brand }) => {
            cmd_options(&cli.artifacts, brand.as_deref())?;
        }
        Some(Commands::Serve { port, host }) => {
            cmd_serve(&host, port, &cli.artifacts, cli.reference_year).await?;
        }
        None => {
            cmd_interactive(&cli.artifacts, cli.reference_year).await?;
        }
    }

    Ok(())
}
