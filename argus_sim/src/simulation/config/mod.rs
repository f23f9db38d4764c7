// argus_sim/src/simulation/config/mod.rs

//! Scenario configuration as parsed from a `scenario.toml` file, plus the
//! vehicle-type catalog it refers to.

mod catalog;

pub use catalog::VehicleCatalog;

use std::path::Path;

use argus_core::geometry::{Edge, GeoProjection};
use argus_core::index::IndexConfig;
use argus_core::perception::{ModifierSpec, PerceptionConfig};
use figment::{
    providers::{Format, Toml},
    Figment,
};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::SimError;
use crate::simulation::utils::serde_helpers;

// =========================================================================
// == Top-Level Scenario ==
// =========================================================================

/// The root of a scenario file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,

    #[serde(default)]
    pub world: WorldConfig,

    #[serde(default)]
    pub index: IndexSection,

    #[serde(default)]
    pub traffic: TrafficConfig,

    // `[[traffic_lights]]` becomes a Vec of TrafficLightConfig structs.
    #[serde(default)]
    pub traffic_lights: Vec<TrafficLightConfig>,

    #[serde(default)]
    pub observers: Vec<ObserverConfig>,
}

impl ScenarioConfig {
    pub fn from_file(path: &Path) -> Result<Self, SimError> {
        // A missing file would silently yield an all-default scenario.
        if !path.is_file() {
            return Err(SimError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("scenario file {} not found", path.display()),
            )));
        }
        info!("Loading scenario from: {}", path.display());
        Ok(Figment::new().merge(Toml::file(path)).extract()?)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, SimError> {
        Ok(Figment::new().merge(Toml::string(toml)).extract()?)
    }
}

// =========================================================================
// == Configuration Sub-Structs ==
// =========================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Optional seed for determinism. A random one is drawn and logged if absent.
    pub seed: Option<u64>,
    #[serde(default = "default_ticks")]
    pub ticks: u32,
    #[serde(default = "default_tick_seconds")]
    pub tick_seconds: f64,
}

fn default_ticks() -> u32 {
    100
}

fn default_tick_seconds() -> f64 {
    0.1
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            ticks: default_ticks(),
            tick_seconds: default_tick_seconds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldConfig {
    pub origin_latitude: f64,
    pub origin_longitude: f64,
    /// Half side length in metres of the square the traffic lives in.
    pub extent: f64,
    /// Building walls as `[x1, y1, x2, y2]` segments.
    #[serde(default, with = "serde_helpers::edges_from_arrays")]
    pub walls: Vec<Edge>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        let origin = GeoProjection::default();
        Self {
            origin_latitude: origin.origin_latitude,
            origin_longitude: origin.origin_longitude,
            extent: 200.0,
            walls: Vec::new(),
        }
    }
}

impl WorldConfig {
    pub fn projection(&self) -> GeoProjection {
        GeoProjection::new(self.origin_latitude, self.origin_longitude)
    }
}

/// Provider strategy for each object kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexSection {
    #[serde(default = "default_vehicle_index")]
    pub vehicles: IndexConfig,
    #[serde(default = "default_traffic_light_index")]
    pub traffic_lights: IndexConfig,
}

fn default_vehicle_index() -> IndexConfig {
    IndexConfig::KdTree { bucket_size: 20 }
}

fn default_traffic_light_index() -> IndexConfig {
    IndexConfig::Linear
}

impl Default for IndexSection {
    fn default() -> Self {
        Self {
            vehicles: default_vehicle_index(),
            traffic_lights: default_traffic_light_index(),
        }
    }
}

/// Synthetic background traffic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrafficConfig {
    pub vehicles: usize,
    /// Catalog keys, assigned round-robin. Empty means default dimensions.
    #[serde(default)]
    pub vehicle_types: Vec<String>,
    /// `[min, max]` speed in m/s.
    #[serde(default = "default_speed_range")]
    pub speed_range: [f64; 2],
}

fn default_speed_range() -> [f64; 2] {
    [5.0, 15.0]
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            vehicles: 50,
            vehicle_types: Vec::new(),
            speed_range: default_speed_range(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrafficLightConfig {
    pub id: String,
    pub group_id: String,
    #[serde(default)]
    pub index: u32,
    #[serde(with = "serde_helpers::vec3_from_array")]
    pub position: Vector3<f64>,
    #[serde(default)]
    pub incoming_lane: String,
    #[serde(default)]
    pub outgoing_lane: String,
    /// Full green → yellow → red → red-yellow period. Non-positive means "off".
    #[serde(default = "default_cycle_seconds")]
    pub cycle_seconds: f64,
    #[serde(default)]
    pub offset_seconds: f64,
}

fn default_cycle_seconds() -> f64 {
    60.0
}

/// Which object kinds an observer asks for every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PerceptionTarget {
    Vehicles,
    TrafficLights,
    #[default]
    All,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObserverConfig {
    pub name: String,
    /// Id of the synthetic vehicle carrying the sensor, e.g. `veh_0`.
    pub vehicle: String,
    /// Per-observer seed. Derived from the scenario seed if absent.
    pub seed: Option<u64>,
    pub viewing_angle: f64,
    pub viewing_range: f64,
    #[serde(default)]
    pub perceive: PerceptionTarget,
    #[serde(default)]
    pub modifiers: Vec<ModifierSpec>,
}

impl ObserverConfig {
    pub fn perception_config(&self) -> PerceptionConfig {
        PerceptionConfig {
            viewing_angle: self.viewing_angle,
            viewing_range: self.viewing_range,
            modifiers: self.modifiers.clone(),
        }
    }
}
