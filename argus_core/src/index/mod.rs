// argus_core/src/index/mod.rs

//! The traffic object index: the single place the simulation pushes per-tick
//! ground truth into and perception queries read from.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, warn};

use crate::error::Result;
use crate::geometry::GeoProjection;
use crate::objects::{SpatialObject, TrafficLightSnapshot, VehicleSnapshot, VehicleType};
use crate::perception::PerceptionModel;

pub mod providers;

pub use providers::{IndexConfig, SpatialIndexProvider};

/// Owns one provider per object kind plus the static vehicle-type registry.
///
/// Updates take `&mut self` and queries `&self`, so the borrow checker already
/// enforces that no query overlaps an update. Between updates the index can
/// be shared across threads for parallel per-observer queries.
#[derive(Debug)]
pub struct TrafficObjectIndex {
    projection: GeoProjection,
    vehicle_types: HashMap<String, VehicleType>,
    untyped_vehicles: HashSet<String>,
    vehicles: Box<dyn SpatialIndexProvider>,
    traffic_lights: Box<dyn SpatialIndexProvider>,
}

/// Builder for [`TrafficObjectIndex`]. Kinds that are not configured get a
/// [`providers::NoneIndex`].
#[derive(Debug, Clone, Default)]
pub struct TrafficObjectIndexBuilder {
    projection: GeoProjection,
    vehicle_index: IndexConfig,
    traffic_light_index: IndexConfig,
}

impl TrafficObjectIndexBuilder {
    pub fn with_projection(mut self, projection: GeoProjection) -> Self {
        self.projection = projection;
        self
    }

    pub fn with_vehicle_index(mut self, config: IndexConfig) -> Self {
        self.vehicle_index = config;
        self
    }

    pub fn with_traffic_light_index(mut self, config: IndexConfig) -> Self {
        self.traffic_light_index = config;
        self
    }

    pub fn build(self) -> Result<TrafficObjectIndex> {
        let vehicles = self.vehicle_index.build()?;
        let traffic_lights = self.traffic_light_index.build()?;
        debug!(
            "Created traffic object index (vehicles: {}, traffic lights: {})",
            vehicles.name(),
            traffic_lights.name()
        );
        Ok(TrafficObjectIndex {
            projection: self.projection,
            vehicle_types: HashMap::new(),
            untyped_vehicles: HashSet::new(),
            vehicles,
            traffic_lights,
        })
    }
}

impl TrafficObjectIndex {
    pub fn builder() -> TrafficObjectIndexBuilder {
        TrafficObjectIndexBuilder::default()
    }

    pub fn projection(&self) -> &GeoProjection {
        &self.projection
    }

    /// Associates static dimensions with a vehicle id. Later position-only
    /// updates for that id use these dimensions to build its footprint.
    pub fn register_vehicle_type(&mut self, vehicle_id: &str, vehicle_type: VehicleType) {
        self.untyped_vehicles.remove(vehicle_id);
        self.vehicle_types.insert(vehicle_id.to_string(), vehicle_type);
    }

    pub fn vehicle_type(&self, vehicle_id: &str) -> Option<&VehicleType> {
        self.vehicle_types.get(vehicle_id)
    }

    /// Replaces the full set of indexed vehicles.
    pub fn update_vehicles(&mut self, snapshots: &[VehicleSnapshot]) {
        let default_type = VehicleType::default();
        let objects = snapshots
            .iter()
            .map(|snapshot| {
                let vehicle_type = match self.vehicle_types.get(&snapshot.id) {
                    Some(t) => t,
                    None => {
                        if self.untyped_vehicles.insert(snapshot.id.clone()) {
                            warn!(
                                "No vehicle type registered for '{}', using default dimensions",
                                snapshot.id
                            );
                        }
                        &default_type
                    }
                };
                SpatialObject::vehicle(snapshot, vehicle_type, &self.projection)
            })
            .collect();
        self.vehicles.update_all(objects);
        debug!("Indexed {} vehicles", self.vehicles.count());
    }

    /// Replaces the full set of indexed traffic lights. Objects are inserted
    /// in id order, so identical input always yields an identical index.
    pub fn update_traffic_lights(&mut self, snapshots: &BTreeMap<String, TrafficLightSnapshot>) {
        let objects = snapshots
            .iter()
            .map(|(id, snapshot)| SpatialObject::traffic_light(id, snapshot, &self.projection))
            .collect();
        self.traffic_lights.update_all(objects);
        debug!("Indexed {} traffic lights", self.traffic_lights.count());
    }

    /// Copies of all vehicles accepted by `model`; empty before the first update.
    pub fn vehicles_in_range(&self, model: &dyn PerceptionModel) -> Vec<SpatialObject> {
        self.vehicles.query_in_range(model)
    }

    /// Copies of all traffic lights accepted by `model`; empty before the first update.
    pub fn traffic_lights_in_range(&self, model: &dyn PerceptionModel) -> Vec<SpatialObject> {
        self.traffic_lights.query_in_range(model)
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.count()
    }

    pub fn traffic_light_count(&self) -> usize {
        self.traffic_lights.count()
    }
}
