mod analysis;
mod builder;
mod config;
mod error;
mod extract;
mod inference;
mod inference_clients;
mod maps;
mod pipeline;
mod web_server;

use crate::analysis::ImagePayload;
use crate::config::AppConfig;
use crate::pipeline::Pipeline;
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "geointel", about = "Image geolocation analysis over a hosted multimodal model")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the web UI and JSON API (the default)
    Serve,
    /// Analyze a single image file and print the report
    Analyze { image: PathBuf },
}

async fn analyze_file(pipeline: &Pipeline, path: &PathBuf) -> Result<()> {
    let bytes = std::fs::read(path)?;
    let mime_type = mime_guess::from_path(path).first_or_octet_stream().to_string();
    info!("Analyzing {:?} ({} bytes, {})", path, bytes.len(), mime_type);

    let report = pipeline.analyze(ImagePayload { bytes, mime_type }).await?;

    println!("model: {}", report.model);
    println!();
    println!("{}", report.analysis.trim_end());
    println!();
    if report.candidates.is_empty() {
        println!("No coordinates extractable from this response.");
    } else {
        for (i, c) in report.candidates.iter().enumerate() {
            println!(
                "Location {}: {:.6}, {:.6}  (from \"{}\")",
                i + 1,
                c.latitude,
                c.longitude,
                c.matched_text
            );
            println!("  map:         {}", c.maps_url);
            println!("  street view: {}", c.street_view_url);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::new()?;

    // Initialize env_logger based on config.log_level
    env_logger::Builder::new()
        .filter_level(config.log_level.parse().unwrap_or(log::LevelFilter::Info))
        .init();

    info!("Starting geointel");

    let pipeline = Arc::new(Pipeline::from_config(config.clone())?);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            if let Err(e) = web_server::start_web_server(Arc::new(config), pipeline).await {
                log::error!("Web server error: {}", e);
            }
        }
        Command::Analyze { image } => {
            analyze_file(&pipeline, &image).await?;
        }
    }

    info!("geointel finished");

    Ok(())
}
