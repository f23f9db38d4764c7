// argus_sim/src/cli.rs

use clap::Parser;
use std::path::PathBuf;

/// Argus: drives the traffic-object perception core through a scripted
/// scenario and reports what every observer perceived.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the scenario TOML file to run.
    #[arg(short, long, default_value = "assets/scenarios/00_intersection.toml")]
    pub scenario: PathBuf,

    /// Directory holding the vehicle-type catalog.
    #[arg(short, long, default_value = "assets/catalog")]
    pub catalog: PathBuf,

    /// Overrides the scenario's random seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Overrides the scenario's number of ticks.
    #[arg(long)]
    pub ticks: Option<u32>,

    /// Write the run summary as TOML to this file.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Default log filter, used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
