// argus_core/src/perception/mod.rs

//! Per-observer perception: a range-and-cone query against the
//! [`TrafficObjectIndex`] followed by an ordered chain of sensor-error
//! modifiers.

pub mod config;
mod model;
pub mod modifiers;

pub use config::{ModifierConfig, ModifierSpec, PerceptionConfig};
pub use model::{ObserverPose, PerceptionModel, SimplePerceptionModel};
pub use modifiers::{ModifierContext, PerceptionModifier};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::error::{PerceptionError, Result};
use crate::geometry::Edge;
use crate::index::TrafficObjectIndex;
use crate::objects::SpatialObject;

/// The observer side of a perception query.
pub trait PerceptionOwner {
    fn id(&self) -> &str;

    fn pose(&self) -> ObserverPose;

    /// Walls close to the observer, consumed by wall occlusion.
    fn surrounding_walls(&self) -> Vec<Edge> {
        Vec::new()
    }
}

/// Validated settings of an enabled module.
#[derive(Debug, Clone)]
pub struct ActivePerception {
    pub viewing_angle: f64,
    pub viewing_range: f64,
    modifiers: Vec<Box<dyn PerceptionModifier>>,
}

impl ActivePerception {
    pub fn modifier_names(&self) -> Vec<&'static str> {
        self.modifiers.iter().map(|m| m.name()).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub enum PerceptionState {
    #[default]
    Disabled,
    Enabled(ActivePerception),
}

#[derive(Clone, Copy)]
enum Query {
    Vehicles,
    TrafficLights,
    Everything,
}

/// One observer's perception module.
///
/// Starts disabled; every query fails with [`PerceptionError::NotEnabled`]
/// until [`enable`](Self::enable) succeeds. Each module owns its random
/// stream, so two modules built with the same seed and fed the same queries
/// produce identical results.
#[derive(Debug, Clone)]
pub struct PerceptionModule {
    state: PerceptionState,
    rng: ChaCha8Rng,
}

impl PerceptionModule {
    pub fn new(seed: u64) -> Self {
        Self {
            state: PerceptionState::Disabled,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Validates `config` and switches the module to it. Calling this again
    /// replaces the previous configuration; on error the module keeps
    /// whatever state it had before.
    pub fn enable(&mut self, config: &PerceptionConfig) -> Result<()> {
        let modifiers = config
            .validate()?
            .iter()
            .map(ModifierConfig::build)
            .collect::<Result<Vec<_>>>()?;
        let active = ActivePerception {
            viewing_angle: config.viewing_angle,
            viewing_range: config.viewing_range,
            modifiers,
        };
        debug!(
            "Enabled perception (angle: {}, range: {}, modifiers: {:?})",
            active.viewing_angle,
            active.viewing_range,
            active.modifier_names()
        );
        self.state = PerceptionState::Enabled(active);
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.state, PerceptionState::Enabled(_))
    }

    pub fn state(&self) -> &PerceptionState {
        &self.state
    }

    pub fn perceived_vehicles(
        &mut self,
        owner: &dyn PerceptionOwner,
        index: &TrafficObjectIndex,
    ) -> Result<Vec<SpatialObject>> {
        self.perceive(owner, index, Query::Vehicles)
    }

    pub fn perceived_traffic_lights(
        &mut self,
        owner: &dyn PerceptionOwner,
        index: &TrafficObjectIndex,
    ) -> Result<Vec<SpatialObject>> {
        self.perceive(owner, index, Query::TrafficLights)
    }

    /// Vehicles and traffic lights in one list, passed through the modifier
    /// chain together so that either kind can occlude the other.
    pub fn perceived_objects(
        &mut self,
        owner: &dyn PerceptionOwner,
        index: &TrafficObjectIndex,
    ) -> Result<Vec<SpatialObject>> {
        self.perceive(owner, index, Query::Everything)
    }

    fn perceive(
        &mut self,
        owner: &dyn PerceptionOwner,
        index: &TrafficObjectIndex,
        query: Query,
    ) -> Result<Vec<SpatialObject>> {
        let PerceptionState::Enabled(active) = &self.state else {
            return Err(PerceptionError::NotEnabled);
        };

        let pose = owner.pose();
        let model =
            SimplePerceptionModel::new(owner.id(), pose, active.viewing_angle, active.viewing_range);
        let mut objects = match query {
            Query::Vehicles => index.vehicles_in_range(&model),
            Query::TrafficLights => index.traffic_lights_in_range(&model),
            Query::Everything => {
                let mut all = index.vehicles_in_range(&model);
                all.extend(index.traffic_lights_in_range(&model));
                all
            }
        };
        trace!("'{}' has {} objects in range", owner.id(), objects.len());

        if active.modifiers.is_empty() {
            return Ok(objects);
        }

        let walls = owner.surrounding_walls();
        let ctx = ModifierContext {
            pose,
            viewing_range: active.viewing_range,
            walls: &walls,
            projection: index.projection(),
        };
        for modifier in &active.modifiers {
            objects = modifier.apply(&ctx, objects, &mut self.rng);
            trace!("'{}' after {}: {} objects", owner.id(), modifier.name(), objects.len());
        }
        Ok(objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexConfig;
    use crate::objects::{TrafficLightSnapshot, TrafficLightState, VehicleSnapshot};
    use nalgebra::Vector3;
    use std::collections::BTreeMap;

    struct Ego;

    impl PerceptionOwner for Ego {
        fn id(&self) -> &str {
            "ego"
        }

        fn pose(&self) -> ObserverPose {
            ObserverPose::new(Vector3::zeros(), 90.0)
        }
    }

    fn index() -> TrafficObjectIndex {
        let mut index = TrafficObjectIndex::builder()
            .with_vehicle_index(IndexConfig::KdTree { bucket_size: 4 })
            .with_traffic_light_index(IndexConfig::Linear)
            .build()
            .unwrap();
        let vehicles: Vec<_> = ["ego", "a", "b"]
            .iter()
            .enumerate()
            .map(|(i, id)| VehicleSnapshot {
                id: id.to_string(),
                position: Vector3::new(10.0 * i as f64, 3.0, 0.0),
                heading: 90.0,
                speed: 10.0,
            })
            .collect();
        index.update_vehicles(&vehicles);
        let mut lights = BTreeMap::new();
        lights.insert(
            "tl_0".to_string(),
            TrafficLightSnapshot {
                position: Vector3::new(15.0, -5.0, 4.0),
                group_id: "j".into(),
                index: 0,
                incoming_lane: "in".into(),
                outgoing_lane: "out".into(),
                state: TrafficLightState::Green,
            },
        );
        index.update_traffic_lights(&lights);
        index
    }

    #[test]
    fn test_disabled_module_rejects_queries() {
        let mut module = PerceptionModule::new(0);
        assert!(!module.is_enabled());
        assert_eq!(
            module.perceived_vehicles(&Ego, &index()),
            Err(PerceptionError::NotEnabled)
        );
    }

    #[test]
    fn test_invalid_config_keeps_previous_state() {
        let mut module = PerceptionModule::new(0);
        module.enable(&PerceptionConfig::new(360.0, 100.0)).unwrap();
        let bad = PerceptionConfig::new(360.0, 100.0).with_modifier(ModifierSpec::new("Nope"));
        assert!(module.enable(&bad).is_err());
        match module.state() {
            PerceptionState::Enabled(active) => assert!(active.modifier_names().is_empty()),
            PerceptionState::Disabled => panic!("module was disabled by a failed enable"),
        }
    }

    #[test]
    fn test_queries_by_kind() {
        let index = index();
        let mut module = PerceptionModule::new(0);
        module.enable(&PerceptionConfig::new(360.0, 100.0)).unwrap();

        let mut vehicles: Vec<_> = module
            .perceived_vehicles(&Ego, &index)
            .unwrap()
            .iter()
            .map(|o| o.id().to_string())
            .collect();
        vehicles.sort();
        assert_eq!(vehicles, vec!["a", "b"]);

        let lights = module.perceived_traffic_lights(&Ego, &index).unwrap();
        assert_eq!(lights.len(), 1);
        assert!(lights[0].is_traffic_light());

        assert_eq!(module.perceived_objects(&Ego, &index).unwrap().len(), 3);
    }

    #[test]
    fn test_modifier_chain_runs_in_order() {
        let index = index();
        let mut module = PerceptionModule::new(0);
        let config = PerceptionConfig::new(360.0, 100.0)
            .with_modifier(ModifierConfig::DistanceFilter { base: 1.0, slope: 0.0 })
            .with_modifier(ModifierConfig::PositionModifier {
                longitudinal_std_dev: 1.0,
                lateral_std_dev: 1.0,
            });
        module.enable(&config).unwrap();
        match module.state() {
            PerceptionState::Enabled(active) => {
                assert_eq!(active.modifier_names(), vec!["DistanceFilter", "PositionModifier"])
            }
            PerceptionState::Disabled => panic!("module should be enabled"),
        }
        assert!(module.perceived_objects(&Ego, &index).unwrap().is_empty());
    }

    #[test]
    fn test_same_seed_same_perception() {
        let index = index();
        let config = PerceptionConfig::new(360.0, 100.0).with_modifier(ModifierConfig::PositionModifier {
            longitudinal_std_dev: 1.0,
            lateral_std_dev: 1.0,
        });
        let mut a = PerceptionModule::new(42);
        let mut b = PerceptionModule::new(42);
        a.enable(&config).unwrap();
        b.enable(&config).unwrap();
        assert_eq!(
            a.perceived_objects(&Ego, &index).unwrap(),
            b.perceived_objects(&Ego, &index).unwrap()
        );
    }
}
