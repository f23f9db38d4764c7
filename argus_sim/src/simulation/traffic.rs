// argus_sim/src/simulation/traffic.rs

//! Synthetic ground truth: straight-line vehicles wrapping around a square
//! world and fixed-time traffic lights.

use std::collections::BTreeMap;

use argus_core::geometry::heading_to_direction;
use argus_core::objects::{TrafficLightSnapshot, TrafficLightState, VehicleSnapshot};
use nalgebra::Vector3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::simulation::config::{TrafficConfig, TrafficLightConfig, WorldConfig};

/// Fractions of the cycle at which each phase ends.
const GREEN_END: f64 = 0.45;
const YELLOW_END: f64 = 0.5;
const RED_END: f64 = 0.95;

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticVehicle {
    pub id: String,
    /// Front bumper.
    pub position: Vector3<f64>,
    pub heading: f64,
    pub speed: f64,
}

#[derive(Debug, Clone)]
pub struct TrafficModel {
    vehicles: Vec<SyntheticVehicle>,
    lights: Vec<TrafficLightConfig>,
    extent: f64,
    elapsed: f64,
}

impl TrafficModel {
    /// Scatters `config.vehicles` vehicles uniformly over the world with
    /// random headings and speeds.
    pub fn spawn(
        config: &TrafficConfig,
        world: &WorldConfig,
        lights: &[TrafficLightConfig],
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let extent = world.extent.abs();
        let [lo, hi] = config.speed_range;
        let (min_speed, max_speed) = (lo.min(hi), lo.max(hi));
        let vehicles = (0..config.vehicles)
            .map(|i| {
                let x = rng.gen_range(-extent..=extent);
                let y = rng.gen_range(-extent..=extent);
                SyntheticVehicle {
                    id: format!("veh_{i}"),
                    position: Vector3::new(x, y, 0.0),
                    heading: rng.gen_range(0.0..360.0),
                    speed: rng.gen_range(min_speed..=max_speed),
                }
            })
            .collect();
        Self {
            vehicles,
            lights: lights.to_vec(),
            extent,
            elapsed: 0.0,
        }
    }

    pub fn vehicles(&self) -> &[SyntheticVehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, id: &str) -> Option<&SyntheticVehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Moves every vehicle along its heading for `dt` seconds. Vehicles that
    /// leave the world re-enter on the opposite side.
    pub fn advance(&mut self, dt: f64) {
        let extent = self.extent;
        for v in &mut self.vehicles {
            let moved = v.position + heading_to_direction(v.heading) * (v.speed * dt);
            v.position = Vector3::new(wrap(moved.x, extent), wrap(moved.y, extent), moved.z);
        }
        self.elapsed += dt;
    }

    pub fn vehicle_snapshots(&self) -> Vec<VehicleSnapshot> {
        self.vehicles
            .iter()
            .map(|v| VehicleSnapshot {
                id: v.id.clone(),
                position: v.position,
                heading: v.heading,
                speed: v.speed,
            })
            .collect()
    }

    pub fn traffic_light_snapshots(&self) -> BTreeMap<String, TrafficLightSnapshot> {
        self.lights
            .iter()
            .map(|l| {
                let snapshot = TrafficLightSnapshot {
                    position: l.position,
                    group_id: l.group_id.clone(),
                    index: l.index,
                    incoming_lane: l.incoming_lane.clone(),
                    outgoing_lane: l.outgoing_lane.clone(),
                    state: light_state(l, self.elapsed),
                };
                (l.id.clone(), snapshot)
            })
            .collect()
    }
}

fn wrap(v: f64, extent: f64) -> f64 {
    if extent <= 0.0 {
        return 0.0;
    }
    (v + extent).rem_euclid(2.0 * extent) - extent
}

/// Fixed-time plan: green, yellow, red, red-yellow.
pub fn light_state(light: &TrafficLightConfig, elapsed: f64) -> TrafficLightState {
    if light.cycle_seconds <= 0.0 {
        return TrafficLightState::Off;
    }
    let phase = ((elapsed + light.offset_seconds) / light.cycle_seconds).rem_euclid(1.0);
    if phase < GREEN_END {
        TrafficLightState::Green
    } else if phase < YELLOW_END {
        TrafficLightState::Yellow
    } else if phase < RED_END {
        TrafficLightState::Red
    } else {
        TrafficLightState::RedYellow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;

    fn light(cycle_seconds: f64, offset_seconds: f64) -> TrafficLightConfig {
        TrafficLightConfig {
            id: "tl".into(),
            group_id: "g".into(),
            index: 0,
            position: Vector3::zeros(),
            incoming_lane: String::new(),
            outgoing_lane: String::new(),
            cycle_seconds,
            offset_seconds,
        }
    }

    fn spawn(seed: u64) -> TrafficModel {
        let config = TrafficConfig {
            vehicles: 40,
            ..Default::default()
        };
        let world = WorldConfig {
            extent: 50.0,
            ..Default::default()
        };
        TrafficModel::spawn(&config, &world, &[light(60.0, 0.0)], &mut ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn test_spawn_is_deterministic() {
        assert_eq!(spawn(5).vehicles(), spawn(5).vehicles());
        assert_ne!(spawn(5).vehicles(), spawn(6).vehicles());
    }

    #[test]
    fn test_vehicles_stay_inside_world() {
        let mut traffic = spawn(1);
        for _ in 0..500 {
            traffic.advance(0.5);
        }
        for v in traffic.vehicles() {
            assert!(v.position.x.abs() <= 50.0 && v.position.y.abs() <= 50.0, "{v:?}");
        }
        assert_abs_diff_eq!(traffic.elapsed(), 250.0, epsilon = 1e-9);
    }

    #[test]
    fn test_wrap_reenters_on_opposite_side() {
        assert_abs_diff_eq!(wrap(55.0, 50.0), -45.0, epsilon = 1e-9);
        assert_abs_diff_eq!(wrap(-51.0, 50.0), 49.0, epsilon = 1e-9);
        assert_abs_diff_eq!(wrap(10.0, 50.0), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fixed_time_plan() {
        let l = light(60.0, 0.0);
        assert_eq!(light_state(&l, 0.0), TrafficLightState::Green);
        assert_eq!(light_state(&l, 28.0), TrafficLightState::Yellow);
        assert_eq!(light_state(&l, 40.0), TrafficLightState::Red);
        assert_eq!(light_state(&l, 58.0), TrafficLightState::RedYellow);
        assert_eq!(light_state(&l, 61.0), TrafficLightState::Green);
        assert_eq!(light_state(&light(60.0, 30.0), 0.0), TrafficLightState::Red);
        assert_eq!(light_state(&light(0.0, 0.0), 10.0), TrafficLightState::Off);
    }

    #[test]
    fn test_snapshots_reflect_model() {
        let traffic = spawn(3);
        let vehicles = traffic.vehicle_snapshots();
        assert_eq!(vehicles.len(), 40);
        assert_eq!(vehicles[0].id, "veh_0");
        let lights = traffic.traffic_light_snapshots();
        assert_eq!(lights["tl"].state, TrafficLightState::Green);
    }
}
