// argus_core/src/spatial/mod.rs

//! Rebuildable point containers answering radius queries.

use nalgebra::Vector3;

use crate::objects::SpatialObject;

mod grid;
mod kd_tree;

pub use grid::SpatialGrid;
pub use kd_tree::KdTree;

/// Anything with a single reference point that a spatial container can
/// partition on.
pub trait Positioned {
    fn point(&self) -> &Vector3<f64>;
}

impl Positioned for SpatialObject {
    fn point(&self) -> &Vector3<f64> {
        self.position()
    }
}

impl Positioned for Vector3<f64> {
    fn point(&self) -> &Vector3<f64> {
        self
    }
}
