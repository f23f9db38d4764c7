// argus_sim/src/simulation/core/runner.rs

//! The tick loop: publish ground truth, then let every observer perceive.

use std::path::Path;

use argus_core::geometry::Edge;
use argus_core::index::TrafficObjectIndex;
use argus_core::objects::VehicleType;
use argus_core::perception::{ObserverPose, PerceptionModule, PerceptionOwner};
use nalgebra::Vector3;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::SimError;
use crate::simulation::config::{PerceptionTarget, ScenarioConfig, VehicleCatalog};
use crate::simulation::core::prng::{observer_seed, SimulationRng};
use crate::simulation::traffic::TrafficModel;

/// Running per-observer count statistics.
#[derive(Debug, Clone, Copy, Default)]
struct CountStats {
    samples: u32,
    total: u64,
    min: usize,
    max: usize,
}

impl CountStats {
    fn record(&mut self, count: usize) {
        if self.samples == 0 {
            self.min = count;
            self.max = count;
        } else {
            self.min = self.min.min(count);
            self.max = self.max.max(count);
        }
        self.samples += 1;
        self.total += count as u64;
    }

    fn mean(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.total as f64 / self.samples as f64
        }
    }
}

#[derive(Debug)]
struct Observer {
    name: String,
    vehicle_id: String,
    viewing_range: f64,
    target: PerceptionTarget,
    module: PerceptionModule,
    stats: CountStats,
}

/// What the perception core sees of an observer during one query.
struct ObserverView<'a> {
    vehicle_id: &'a str,
    pose: ObserverPose,
    viewing_range: f64,
    walls: &'a [Edge],
}

impl PerceptionOwner for ObserverView<'_> {
    fn id(&self) -> &str {
        self.vehicle_id
    }

    fn pose(&self) -> ObserverPose {
        self.pose
    }

    fn surrounding_walls(&self) -> Vec<Edge> {
        self.walls
            .iter()
            .filter(|w| distance_to_segment_xy(&self.pose.position, w) <= self.viewing_range)
            .copied()
            .collect()
    }
}

fn distance_to_segment_xy(p: &Vector3<f64>, edge: &Edge) -> f64 {
    let ab = (edge.b - edge.a).xy();
    let ap = (p - edge.a).xy();
    let len_sqr = ab.norm_squared();
    let t = if len_sqr > 0.0 {
        (ap.dot(&ab) / len_sqr).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (ap - ab * t).norm()
}

/// Perceived-object counts of one observer over a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObserverSummary {
    pub name: String,
    pub vehicle: String,
    pub mean: f64,
    pub min: usize,
    pub max: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Kept as text since TOML integers are signed 64-bit.
    pub seed: String,
    pub ticks: u32,
    pub simulated_seconds: f64,
    pub vehicles: usize,
    pub traffic_lights: usize,
    pub observers: Vec<ObserverSummary>,
}

impl RunSummary {
    pub fn to_toml(&self) -> Result<String, SimError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<(), SimError> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

/// Counts of one tick, in observer order.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub tick: u32,
    pub time: f64,
    pub perceived: Vec<(String, usize)>,
}

/// A fully wired scenario: traffic, index and observers.
#[derive(Debug)]
pub struct Simulation {
    seed: u64,
    tick_seconds: f64,
    tick: u32,
    traffic: TrafficModel,
    index: TrafficObjectIndex,
    walls: Vec<Edge>,
    observers: Vec<Observer>,
}

impl Simulation {
    pub fn new(config: &ScenarioConfig, catalog: &VehicleCatalog, seed: u64) -> Result<Self, SimError> {
        let mut index = TrafficObjectIndex::builder()
            .with_projection(config.world.projection())
            .with_vehicle_index(config.index.vehicles.clone())
            .with_traffic_light_index(config.index.traffic_lights.clone())
            .build()?;

        let mut rng = SimulationRng::from_seed(seed);
        let traffic = TrafficModel::spawn(
            &config.traffic,
            &config.world,
            &config.traffic_lights,
            &mut rng.0,
        );

        let vehicle_types = config
            .traffic
            .vehicle_types
            .iter()
            .map(|key| {
                catalog
                    .get(key)
                    .cloned()
                    .ok_or_else(|| SimError::UnknownVehicleType(key.clone()))
            })
            .collect::<Result<Vec<VehicleType>, _>>()?;
        if !vehicle_types.is_empty() {
            for (vehicle, vehicle_type) in traffic.vehicles().iter().zip(vehicle_types.iter().cycle()) {
                index.register_vehicle_type(&vehicle.id, vehicle_type.clone());
            }
        }

        let mut observers = Vec::with_capacity(config.observers.len());
        for (i, oc) in config.observers.iter().enumerate() {
            if traffic.vehicle(&oc.vehicle).is_none() {
                return Err(SimError::UnknownVehicle {
                    observer: oc.name.clone(),
                    vehicle: oc.vehicle.clone(),
                });
            }
            let mut module = PerceptionModule::new(oc.seed.unwrap_or_else(|| observer_seed(seed, i)));
            module.enable(&oc.perception_config())?;
            info!(
                "Observer '{}' attached to '{}' ({} modifiers)",
                oc.name,
                oc.vehicle,
                oc.modifiers.len()
            );
            observers.push(Observer {
                name: oc.name.clone(),
                vehicle_id: oc.vehicle.clone(),
                viewing_range: oc.viewing_range,
                target: oc.perceive,
                module,
                stats: CountStats::default(),
            });
        }

        Ok(Self {
            seed,
            tick_seconds: config.simulation.tick_seconds,
            tick: 0,
            traffic,
            index,
            walls: config.world.walls.clone(),
            observers,
        })
    }

    pub fn index(&self) -> &TrafficObjectIndex {
        &self.index
    }

    pub fn traffic(&self) -> &TrafficModel {
        &self.traffic
    }

    /// Runs a single tick. All index updates complete before the first
    /// perception query of the tick.
    pub fn step(&mut self) -> Result<TickReport, SimError> {
        self.index.update_vehicles(&self.traffic.vehicle_snapshots());
        self.index
            .update_traffic_lights(&self.traffic.traffic_light_snapshots());

        let mut perceived = Vec::with_capacity(self.observers.len());
        for observer in &mut self.observers {
            let Some(vehicle) = self.traffic.vehicle(&observer.vehicle_id) else {
                continue;
            };
            let view = ObserverView {
                vehicle_id: &observer.vehicle_id,
                pose: ObserverPose::new(vehicle.position, vehicle.heading),
                viewing_range: observer.viewing_range,
                walls: &self.walls,
            };
            let objects = match observer.target {
                PerceptionTarget::Vehicles => observer.module.perceived_vehicles(&view, &self.index)?,
                PerceptionTarget::TrafficLights => {
                    observer.module.perceived_traffic_lights(&view, &self.index)?
                }
                PerceptionTarget::All => observer.module.perceived_objects(&view, &self.index)?,
            };
            debug!("Tick {}: '{}' perceives {} objects", self.tick, observer.name, objects.len());
            observer.stats.record(objects.len());
            perceived.push((observer.name.clone(), objects.len()));
        }

        let report = TickReport {
            tick: self.tick,
            time: self.traffic.elapsed(),
            perceived,
        };
        self.traffic.advance(self.tick_seconds);
        self.tick += 1;
        Ok(report)
    }

    pub fn run(&mut self, ticks: u32) -> Result<RunSummary, SimError> {
        info!(
            "Running {} ticks with {} vehicles, {} traffic lights and {} observers",
            ticks,
            self.traffic.vehicles().len(),
            self.traffic.traffic_light_snapshots().len(),
            self.observers.len()
        );
        for _ in 0..ticks {
            self.step()?;
        }
        Ok(self.summary())
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            seed: self.seed.to_string(),
            ticks: self.tick,
            simulated_seconds: self.traffic.elapsed(),
            vehicles: self.index.vehicle_count(),
            traffic_lights: self.index.traffic_light_count(),
            observers: self
                .observers
                .iter()
                .map(|o| ObserverSummary {
                    name: o.name.clone(),
                    vehicle: o.vehicle_id.clone(),
                    mean: o.stats.mean(),
                    min: o.stats.min,
                    max: o.stats.max,
                })
                .collect(),
        }
    }
}
