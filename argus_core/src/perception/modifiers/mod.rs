// argus_core/src/perception/modifiers/mod.rs

//! Sensor-error stages applied to a perception result.
//!
//! A stage receives the objects that survived the previous stage and returns
//! a new list. Stages only ever see copies handed out by the index, so they
//! are free to move, resize or drop whatever they like.

pub mod bounding_box_occlusion;
pub mod dimensions;
pub mod distance_filter;
pub mod heading;
pub mod position;
pub mod simple_occlusion;
pub mod wall_occlusion;

pub use bounding_box_occlusion::BoundingBoxOcclusion;
pub use dimensions::DimensionsModifier;
pub use distance_filter::DistanceFilter;
pub use heading::HeadingModifier;
pub use position::PositionModifier;
pub use simple_occlusion::SimpleOcclusion;
pub use wall_occlusion::WallOcclusion;

use std::fmt::Debug;

use dyn_clone::DynClone;
use nalgebra::Vector3;
use rand::RngCore;

use crate::geometry::{Edge, GeoProjection};
use crate::objects::SpatialObject;
use crate::perception::ObserverPose;

/// Per-query information a stage may need besides the objects themselves.
#[derive(Debug, Clone, Copy)]
pub struct ModifierContext<'a> {
    pub pose: ObserverPose,
    pub viewing_range: f64,
    /// Walls around the observer, used by [`WallOcclusion`].
    pub walls: &'a [Edge],
    /// Needed to keep geographic positions in sync after moving an object.
    pub projection: &'a GeoProjection,
}

impl ModifierContext<'_> {
    pub fn observer(&self) -> &Vector3<f64> {
        &self.pose.position
    }
}

/// A single stage of the modifier chain.
///
/// Implementations must draw all randomness from `rng` so that results are
/// reproducible for a given seed.
pub trait PerceptionModifier: Send + Sync + DynClone + Debug {
    fn name(&self) -> &'static str;

    fn apply(
        &self,
        ctx: &ModifierContext,
        objects: Vec<SpatialObject>,
        rng: &mut dyn RngCore,
    ) -> Vec<SpatialObject>;
}

dyn_clone::clone_trait_object!(PerceptionModifier);

/// Unit vector from the observer to `target` in the XY plane, if they are
/// not stacked on top of each other.
pub(crate) fn sightline_direction(observer: &Vector3<f64>, target: &Vector3<f64>) -> Option<Vector3<f64>> {
    let d = Vector3::new(target.x - observer.x, target.y - observer.y, 0.0);
    let n = d.norm();
    (n > 0.0).then(|| d / n)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::objects::{VehicleSnapshot, VehicleType};

    pub const PROJECTION: GeoProjection = GeoProjection {
        origin_latitude: 52.5,
        origin_longitude: 13.4,
    };

    pub fn context(walls: &[Edge]) -> ModifierContext<'_> {
        ModifierContext {
            pose: ObserverPose::new(Vector3::zeros(), 90.0),
            viewing_range: 100.0,
            walls,
            projection: &PROJECTION,
        }
    }

    /// A 4 x 2 metre car whose front bumper is at (x, y).
    pub fn car(id: &str, x: f64, y: f64, heading: f64) -> SpatialObject {
        let snapshot = VehicleSnapshot {
            id: id.to_string(),
            position: Vector3::new(x, y, 0.0),
            heading,
            speed: 0.0,
        };
        let vtype = VehicleType {
            name: "car".into(),
            length: 4.0,
            width: 2.0,
            height: 1.5,
            vehicle_class: Default::default(),
        };
        SpatialObject::vehicle(&snapshot, &vtype, &PROJECTION)
    }

    pub fn ids(objects: &[SpatialObject]) -> Vec<&str> {
        objects.iter().map(|o| o.id()).collect()
    }
}
