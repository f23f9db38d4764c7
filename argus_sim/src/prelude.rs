// argus_sim/src/prelude.rs

pub use crate::cli::Cli;
pub use crate::error::SimError;
pub use crate::simulation::config::{
    ObserverConfig, PerceptionTarget, ScenarioConfig, TrafficConfig, VehicleCatalog, WorldConfig,
};
pub use crate::simulation::core::prng::SimulationRng;
pub use crate::simulation::core::runner::{RunSummary, Simulation, TickReport};
pub use crate::simulation::traffic::TrafficModel;
