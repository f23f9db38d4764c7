// argus_core/src/geometry/ray.rs

use nalgebra::Vector3;

/// A half-line starting at `origin` and extending along `direction`.
/// The direction does not need to be normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vector3<f64>,
    pub direction: Vector3<f64>,
}

impl Ray {
    pub fn new(origin: Vector3<f64>, direction: Vector3<f64>) -> Self {
        Self { origin, direction }
    }

    /// Ray from `from` through `to`.
    pub fn through(from: Vector3<f64>, to: Vector3<f64>) -> Self {
        Self::new(from, to - from)
    }

    /// Point at parametric distance `t` along the ray.
    pub fn point_at(&self, t: f64) -> Vector3<f64> {
        self.origin + self.direction * t
    }

    /// A ray whose direction has no length cannot hit anything.
    pub fn is_degenerate(&self) -> bool {
        let n = self.direction.norm_squared();
        n == 0.0 || !n.is_finite()
    }
}
