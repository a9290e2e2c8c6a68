//! agrifert - Main entry point

use agrifert::cli::{cmd_classes, cmd_recommend, cmd_serve, Cli, Commands};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agrifert=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Recommend {
            temperature,
            humidity,
            moisture,
            soil_type,
            crop_type,
            nitrogen,
            potassium,
            phosphorous,
            land_area,
        } => {
            cmd_recommend(
                &cli.data,
                temperature,
                humidity,
                moisture,
                &soil_type,
                &crop_type,
                nitrogen,
                potassium,
                phosphorous,
                land_area,
            )?;
        }
        Commands::Serve { host, port } => {
            cmd_serve(&cli.data, host, port).await?;
        }
        Commands::Classes => {
            cmd_classes(&cli.data)?;
        }
    }

    Ok(())
}
