// argus_sim/src/lib.rs

use tracing::info;

use crate::cli::Cli;
use crate::error::SimError;
use crate::simulation::config::{ScenarioConfig, VehicleCatalog};
use crate::simulation::core::runner::{RunSummary, Simulation};

// This prelude is for convenience for other files WITHIN the argus_sim crate.
pub mod prelude;

pub mod cli;
pub mod error;
pub mod logging;
pub mod simulation;

/// Loads everything the command line points at and runs the scenario to
/// completion.
pub fn run(cli: &Cli) -> Result<RunSummary, SimError> {
    let scenario = ScenarioConfig::from_file(&cli.scenario)?;
    let catalog = VehicleCatalog::load(&cli.catalog)?;

    let seed = match cli.seed.or(scenario.simulation.seed) {
        Some(seed) => seed,
        None => {
            let seed = rand::random::<u64>();
            info!("No seed configured, using {}", seed);
            seed
        }
    };
    let ticks = cli.ticks.unwrap_or(scenario.simulation.ticks);

    let mut simulation = Simulation::new(&scenario, &catalog, seed)?;
    let summary = simulation.run(ticks)?;

    for observer in &summary.observers {
        info!(
            "'{}' perceived {:.1} objects on average (min {}, max {})",
            observer.name, observer.mean, observer.min, observer.max
        );
    }
    if let Some(path) = &cli.report {
        summary.write_to(path)?;
        info!("Wrote run report to {}", path.display());
    }
    Ok(summary)
}
