use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

use poiscrape::config::{FileConfig, Overrides, ScraperConfig};
use poiscrape::jobs::{JobEvent, Pipeline};
use poiscrape::logging::init_logging;

/// Scrape shops (umkm), tourist attractions (wisata) and training
/// facilities (pelatihan) for a city from OpenStreetMap into JSON files
///
/// Examples:
///   # Scrape Kota Bandung into lib/data
///   poiscrape
///
///   # Another city, reproducible placeholder fields
///   poiscrape -c "Kota Yogyakarta" -o data --seed 42
///
///   # Everything within 3km of a point
///   poiscrape --lat -6.9175 --lon 107.6191 -r 3000
#[derive(Parser, Debug)]
#[command(name = "poiscrape")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches poiscrape.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Area name as tagged in OpenStreetMap (default: "Kota Bandung")
    #[arg(short = 'c', long)]
    city: Option<String>,

    /// Latitude for a radius search (use with --lon)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude for a radius search (use with --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Search radius in meters around --lat/--lon (default: 5000)
    #[arg(short = 'r', long)]
    radius: Option<u32>,

    /// Directory the JSON files are written to (default: lib/data)
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,

    /// Overpass API interpreter endpoint
    #[arg(long)]
    overpass_url: Option<String>,

    /// HTTP timeout in seconds, 0 to wait forever (default: 200)
    #[arg(long)]
    timeout: Option<u64>,

    /// Seed for the synthesized address and phone fields
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            city: self.city.clone(),
            lat: self.lat,
            lon: self.lon,
            radius: self.radius,
            output_dir: self.output_dir.clone(),
            overpass_url: self.overpass_url.clone(),
            timeout_secs: self.timeout,
            seed: self.seed,
            verbose: self.verbose,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = match args.config {
        Some(ref config_path) => Some(FileConfig::load_from(config_path)?),
        None => FileConfig::load(),
    };
    let config = ScraperConfig::resolve(args.overrides(), file_config)
        .context("Invalid configuration")?;

    init_logging(config.verbose)?;

    println!("poiscrape - OpenStreetMap POI Scraper");
    println!("=====================================");
    println!();

    if config.verbose {
        println!("Configuration:");
        println!("  Area: {}", config.scope);
        println!("  Output: {}", config.output_dir.display());
        println!("  Overpass: {}", config.overpass.url);
        println!("  Timeout: {}s", config.overpass.timeout_secs);
        match config.seed {
            Some(seed) => println!("  Seed: {}", seed),
            None => println!("  Seed: random"),
        }
        println!();
    }

    let mut pipeline = Pipeline::from_config(&config)?;

    let mut spinner: Option<(ProgressBar, Instant)> = None;
    let result = pipeline.run_all(|event| match event {
        JobEvent::Started(category) => {
            spinner = Some((
                create_spinner(&format!("Scraping {}...", category.label())),
                Instant::now(),
            ));
        }
        JobEvent::Finished(report) => {
            if let Some((pb, start)) = spinner.take() {
                let message = format!(
                    "{} [{:.1}s]",
                    report.summary(),
                    start.elapsed().as_secs_f32()
                );
                // Spinners draw on stderr and vanish when it is not a terminal
                if pb.is_hidden() {
                    println!("{}", message);
                }
                pb.finish_with_message(message);
            }
        }
    });

    if let Some((pb, _)) = spinner.take() {
        pb.abandon();
    }
    let reports = result?;

    let total: usize = reports.iter().map(|r| r.written).sum();
    println!();
    println!(
        "Done! {} records in {} files. Total time: {:.1}s",
        total,
        reports.len(),
        total_start.elapsed().as_secs_f32()
    );

    Ok(())
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
