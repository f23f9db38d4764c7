// argus_core/src/objects.rs

//! The perceivable traffic objects and the per-tick snapshots they are built
//! from.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::geometry::{
    heading_to_direction, normalize_heading, BoundingBox, Edge, GeoPoint, GeoProjection,
};

// =========================================================================
// == Static Metadata ==
// =========================================================================

/// Physical extent of an object. Vehicles are modelled as boxes whose
/// footprint is `length` along the heading and `width` across it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum VehicleClass {
    #[default]
    Car,
    Truck,
    Bus,
    Motorcycle,
    Bicycle,
    EmergencyVehicle,
    Unknown,
}

/// Static vehicle-type information that position-only updates are combined
/// with to build a full [`SpatialObject`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VehicleType {
    pub name: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub vehicle_class: VehicleClass,
}

impl Default for VehicleType {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            length: 5.0,
            width: 1.8,
            height: 1.5,
            vehicle_class: VehicleClass::Car,
        }
    }
}

impl VehicleType {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.length, self.width, self.height)
    }
}

// =========================================================================
// == Per-Tick Snapshots (inbound from the simulation) ==
// =========================================================================

/// Ground-truth state of one vehicle for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleSnapshot {
    pub id: String,
    /// Front-bumper position in the projected frame.
    pub position: Vector3<f64>,
    /// Degrees, 0 = north, clockwise.
    pub heading: f64,
    /// m/s
    pub speed: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum TrafficLightState {
    Red,
    RedYellow,
    Yellow,
    Green,
    #[default]
    Off,
}

/// Ground-truth state of one signal head for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficLightSnapshot {
    pub position: Vector3<f64>,
    pub group_id: String,
    /// Index of this signal within its group's state string.
    pub index: u32,
    pub incoming_lane: String,
    pub outgoing_lane: String,
    pub state: TrafficLightState,
}

// =========================================================================
// == Spatial Objects ==
// =========================================================================

/// Kind-specific attributes of a [`SpatialObject`].
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Vehicle {
        vehicle_class: VehicleClass,
    },
    TrafficLight {
        group_id: String,
        index: u32,
        incoming_lane: String,
        outgoing_lane: String,
        state: TrafficLightState,
    },
}

/// A perceivable traffic object as stored by the index for a single tick.
///
/// For vehicles the reference `position` is the centre of the front bumper;
/// the footprint extends `length` metres backwards from it.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialObject {
    id: String,
    position: Vector3<f64>,
    geo_position: GeoPoint,
    heading: f64,
    dimensions: Dimensions,
    speed: f64,
    kind: ObjectKind,
}

impl SpatialObject {
    pub fn vehicle(
        snapshot: &VehicleSnapshot,
        vehicle_type: &VehicleType,
        projection: &GeoProjection,
    ) -> Self {
        Self {
            id: snapshot.id.clone(),
            position: snapshot.position,
            geo_position: projection.cartesian_to_geo(&snapshot.position),
            heading: normalize_heading(snapshot.heading),
            dimensions: vehicle_type.dimensions(),
            speed: snapshot.speed,
            kind: ObjectKind::Vehicle {
                vehicle_class: vehicle_type.vehicle_class,
            },
        }
    }

    pub fn traffic_light(
        id: &str,
        snapshot: &TrafficLightSnapshot,
        projection: &GeoProjection,
    ) -> Self {
        Self {
            id: id.to_string(),
            position: snapshot.position,
            geo_position: projection.cartesian_to_geo(&snapshot.position),
            heading: 0.0,
            dimensions: Dimensions::default(),
            speed: 0.0,
            kind: ObjectKind::TrafficLight {
                group_id: snapshot.group_id.clone(),
                index: snapshot.index,
                incoming_lane: snapshot.incoming_lane.clone(),
                outgoing_lane: snapshot.outgoing_lane.clone(),
                state: snapshot.state,
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> &Vector3<f64> {
        &self.position
    }

    pub fn geo_position(&self) -> &GeoPoint {
        &self.geo_position
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    pub fn length(&self) -> f64 {
        self.dimensions.length
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn is_vehicle(&self) -> bool {
        matches!(self.kind, ObjectKind::Vehicle { .. })
    }

    pub fn is_traffic_light(&self) -> bool {
        matches!(self.kind, ObjectKind::TrafficLight { .. })
    }

    pub fn distance_sqr_to(&self, p: &Vector3<f64>) -> f64 {
        (self.position - p).norm_squared()
    }

    /// Unit vector along the object's heading in the XY plane.
    pub fn forward(&self) -> Vector3<f64> {
        heading_to_direction(self.heading)
    }

    /// Centre of the ground footprint.
    pub fn center(&self) -> Vector3<f64> {
        self.position - self.forward() * (self.dimensions.length * 0.5)
    }

    /// Ground footprint corners, counter-clockwise starting front-left.
    pub fn footprint(&self) -> [Vector3<f64>; 4] {
        let forward = self.forward();
        let right = Vector3::new(forward.y, -forward.x, 0.0);
        let c = self.center();
        let half_l = forward * (self.dimensions.length * 0.5);
        let half_w = right * (self.dimensions.width * 0.5);
        [
            c + half_l - half_w,
            c - half_l - half_w,
            c - half_l + half_w,
            c + half_l + half_w,
        ]
    }

    /// The four sides of the footprint, following [`footprint`](Self::footprint).
    pub fn footprint_edges(&self) -> [Edge; 4] {
        let fp = self.footprint();
        [
            Edge::new(fp[0], fp[1]),
            Edge::new(fp[1], fp[2]),
            Edge::new(fp[2], fp[3]),
            Edge::new(fp[3], fp[0]),
        ]
    }

    /// Axis-aligned box around the footprint, from ground to roof.
    pub fn bounding_box(&self) -> BoundingBox {
        let up = Vector3::new(0.0, 0.0, self.dimensions.height);
        let mut bb = BoundingBox::new();
        for corner in self.footprint() {
            bb.add_points([&corner, &(corner + up)]);
        }
        bb
    }

    /// Moves the reference point, keeping the geographic position in sync.
    pub fn set_position(&mut self, position: Vector3<f64>, projection: &GeoProjection) {
        self.position = position;
        self.geo_position = projection.cartesian_to_geo(&position);
    }

    /// Rotates the object around its footprint centre. Since the reference
    /// point sits on the front bumper, it moves along with the heading.
    pub fn set_heading(&mut self, heading: f64, projection: &GeoProjection) {
        let center = self.center();
        self.heading = normalize_heading(heading);
        let front = center + self.forward() * (self.dimensions.length * 0.5);
        self.set_position(front, projection);
    }

    /// Resizes the object around its footprint centre, moving the front-bumper
    /// reference point accordingly.
    pub fn set_dimensions(&mut self, dimensions: Dimensions, projection: &GeoProjection) {
        let center = self.center();
        self.dimensions = dimensions;
        let front = center + self.forward() * (self.dimensions.length * 0.5);
        self.set_position(front, projection);
    }
}
