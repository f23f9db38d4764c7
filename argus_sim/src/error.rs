// argus_sim/src/error.rs

use std::path::PathBuf;

use argus_core::error::PerceptionError;
use thiserror::Error;

/// Everything that can stop a scenario run.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("failed to load scenario: {0}")]
    Config(#[from] figment::Error),

    #[error("failed to load catalog item {path:?}: {source}")]
    Catalog {
        path: PathBuf,
        source: figment::Error,
    },

    #[error("vehicle type '{0}' is not in the catalog")]
    UnknownVehicleType(String),

    #[error("observer '{observer}' is attached to unknown vehicle '{vehicle}'")]
    UnknownVehicle { observer: String, vehicle: String },

    #[error(transparent)]
    Perception(#[from] PerceptionError),

    #[error("failed to serialize run report: {0}")]
    Report(#[from] toml::ser::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to initialize logging: {0}")]
    Logging(String),
}
