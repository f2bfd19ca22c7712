mod demo;
mod report;

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use demo::{build_reducer, motor};
use gearx::{analyze, AnalysisConfig};
use report::render_report;

#[derive(Parser)]
#[command(name = "gearx")]
#[command(author, version, about = "Load and strength analysis of a two-stage helical reducer")]
struct Cli {
    /// Print the full result tree as JSON instead of the text summary
    #[arg(long)]
    json: bool,

    /// Analysis configuration file (JSON); missing fields keep their defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Diagnostics go through the `log` facade; enable them with RUST_LOG=gearx=debug.
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AnalysisConfig::from_path(path)?,
        None => AnalysisConfig::default(),
    };

    // Describe the gears, shafts and bearings, then run every analysis step at the
    // motor's rated point.
    let gearbox = build_reducer()?;
    let report = analyze(&gearbox, &motor(), &config);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render_report(&report, &config.requirements));
    }

    Ok(())
}
