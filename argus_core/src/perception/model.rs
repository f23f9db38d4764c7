// argus_core/src/perception/model.rs

use nalgebra::Vector3;

use crate::geometry::{direction_to_heading, heading_difference, BoundingBox};
use crate::objects::SpatialObject;

/// The shape of a single perception query.
///
/// `bounding_box` is a coarse volume the index uses for pruning; every
/// candidate that survives pruning is then checked with `is_in_range`.
pub trait PerceptionModel {
    fn is_in_range(&self, other: &SpatialObject) -> bool;

    fn bounding_box(&self) -> BoundingBox;
}

/// Where an observer is and which way it is looking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverPose {
    pub position: Vector3<f64>,
    /// Degrees, 0 = north, clockwise.
    pub heading: f64,
}

impl ObserverPose {
    pub fn new(position: Vector3<f64>, heading: f64) -> Self {
        Self { position, heading }
    }
}

/// Range-and-cone model: an object is in range if its reference point is no
/// farther than `viewing_range` and lies within `viewing_angle / 2` of the
/// observer's heading. The observer never perceives itself.
#[derive(Debug, Clone)]
pub struct SimplePerceptionModel {
    owner_id: String,
    pose: ObserverPose,
    viewing_angle: f64,
    viewing_range: f64,
}

impl SimplePerceptionModel {
    pub fn new(owner_id: &str, pose: ObserverPose, viewing_angle: f64, viewing_range: f64) -> Self {
        Self {
            owner_id: owner_id.to_string(),
            pose,
            viewing_angle,
            viewing_range,
        }
    }

    fn is_within_angle(&self, target: &Vector3<f64>) -> bool {
        if self.viewing_angle >= 360.0 {
            return true;
        }
        let to_target = target - self.pose.position;
        if to_target.x == 0.0 && to_target.y == 0.0 {
            // Directly above or below the observer.
            return true;
        }
        let bearing = direction_to_heading(&to_target);
        heading_difference(self.pose.heading, bearing).abs() <= self.viewing_angle / 2.0
    }
}

impl PerceptionModel for SimplePerceptionModel {
    fn is_in_range(&self, other: &SpatialObject) -> bool {
        other.id() != self.owner_id
            && other.distance_sqr_to(&self.pose.position) <= self.viewing_range * self.viewing_range
            && self.is_within_angle(other.position())
    }

    fn bounding_box(&self) -> BoundingBox {
        let r = self.viewing_range;
        BoundingBox::around(self.pose.position, Vector3::new(r, r, r))
    }
}
