//! Command-line interface

use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;

use crate::dataset::FertilizerDataset;
use crate::engine::{RecommendRequest, Recommender, Suggestion};
use crate::error::Result;
use crate::server::{run_server, ServerConfig};

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", "─".repeat(48).truecolor(100, 100, 100));
}

fn kv(key: &str, val: &str) {
    println!("  {} {}", format!("{key:<24}").truecolor(140, 140, 140), val.white());
}

#[derive(Parser)]
#[command(name = "agrifert")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fertilizer recommendation engine")]
pub struct Cli {
    /// Training dataset (CSV)
    #[arg(short, long, global = true, default_value = "data/fertilizer.csv")]
    pub data: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recommend a fertilizer for the given farm conditions
    Recommend {
        /// Temperature in degrees Celsius (0-50)
        #[arg(long, default_value = "30")]
        temperature: f64,

        /// Relative humidity percentage (0-100)
        #[arg(long, default_value = "60")]
        humidity: f64,

        /// Soil moisture percentage (0-100)
        #[arg(long, default_value = "40")]
        moisture: f64,

        /// Soil type (must be known from the training data)
        #[arg(long)]
        soil_type: String,

        /// Crop type (unknown values fall back to the first known crop)
        #[arg(long)]
        crop_type: String,

        /// Current nitrogen level
        #[arg(long, default_value = "20")]
        nitrogen: f64,

        /// Current potassium level
        #[arg(long, default_value = "15")]
        potassium: f64,

        /// Current phosphorous level
        #[arg(long, default_value = "10")]
        phosphorous: f64,

        /// Land area in units (must be positive)
        #[arg(long, default_value = "1.0")]
        land_area: f64,
    },

    /// Start the HTTP API
    Serve {
        /// Host to bind (falls back to API_HOST, then 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (falls back to API_PORT, then 8080)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the soil, crop, and fertilizer labels known from training
    Classes,
}

fn fit_recommender(data: &PathBuf) -> Result<Recommender> {
    let dataset = FertilizerDataset::from_csv(&data.to_string_lossy())?;
    Recommender::fit(&dataset)
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_recommend(
    data: &PathBuf,
    temperature: f64,
    humidity: f64,
    moisture: f64,
    soil_type: &str,
    crop_type: &str,
    nitrogen: f64,
    potassium: f64,
    phosphorous: f64,
    land_area: f64,
) -> Result<()> {
    let recommender = fit_recommender(data)?;

    let request = RecommendRequest {
        temperature,
        humidity,
        moisture,
        soil_type: soil_type.to_string(),
        crop_type: crop_type.to_string(),
        nitrogen,
        potassium,
        phosphorous,
        land_area,
    };

    let rec = recommender.recommend(&request)?;

    section("Recommended Fertilizer");
    kv("Fertilizer type", &rec.fertilizer.green().bold().to_string());
    kv("Recommended amount", &format!("{:.2} units (total)", rec.total_amount));
    kv(
        "Optimized per unit area",
        &format!("{:.2} units", rec.optimized_amount),
    );

    if let Some(fallback) = &rec.crop_fallback {
        println!();
        println!(
            "  {} crop type '{}' is not recognized, defaulted to '{}'",
            "warning:".yellow().bold(),
            crop_type,
            fallback
        );
    }

    if let Some(npk) = &rec.npk {
        section("Suggested NPK Distribution");
        kv("Nitrogen", &format!("{:.2} units", npk.nitrogen));
        kv("Phosphorous", &format!("{:.2} units", npk.phosphorous));
        kv("Potassium", &format!("{:.2} units", npk.potassium));
    }

    println!();
    let suggestion = rec.suggestion.to_string();
    match rec.suggestion {
        Suggestion::Reduce(_) => println!("  {}", suggestion.yellow()),
        Suggestion::Increase(_) => println!("  {}", suggestion.green()),
        Suggestion::Optimal => println!("  {}", suggestion.cyan()),
    }
    println!();

    Ok(())
}

pub async fn cmd_serve(data: &PathBuf, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let recommender = Arc::new(fit_recommender(data)?);

    // Flags win over API_HOST/API_PORT, which win over the built-in defaults
    let mut config = ServerConfig::default();
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    run_server(config, recommender).await
}

pub fn cmd_classes(data: &PathBuf) -> Result<()> {
    let recommender = fit_recommender(data)?;

    section("Soil Types");
    for label in recommender.soil_types() {
        println!("  {label}");
    }
    section("Crop Types");
    for label in recommender.crop_types() {
        println!("  {label}");
    }
    section("Fertilizers");
    for label in recommender.fertilizer_names() {
        println!("  {label}");
    }
    println!();

    Ok(())
}
