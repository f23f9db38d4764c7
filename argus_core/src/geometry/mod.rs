// argus_core/src/geometry/mod.rs

//! Pure geometric primitives used by the spatial index and the occlusion
//! modifiers. Everything here works in the projected ENU frame
//! (x = east, y = north, z = up, metres).

mod bounding_box;
mod edge;
mod geo;
mod ray;

pub use bounding_box::BoundingBox;
pub use edge::Edge;
pub use geo::{GeoPoint, GeoProjection};
pub use ray::Ray;

use nalgebra::Vector3;

/// Unit vector in the XY plane pointing along `heading_deg`
/// (0 = north, clockwise positive).
pub fn heading_to_direction(heading_deg: f64) -> Vector3<f64> {
    let h = heading_deg.to_radians();
    Vector3::new(h.sin(), h.cos(), 0.0)
}

/// Heading (0 = north, clockwise, in `[0, 360)`) of the XY projection of `v`.
/// Returns 0 for a vector without horizontal extent.
pub fn direction_to_heading(v: &Vector3<f64>) -> f64 {
    if v.x == 0.0 && v.y == 0.0 {
        return 0.0;
    }
    normalize_heading(v.x.atan2(v.y).to_degrees())
}

/// Wraps an angle in degrees into `[0, 360)`.
pub fn normalize_heading(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Signed smallest difference `to - from` in degrees, in `[-180, 180)`.
pub fn heading_difference(from_deg: f64, to_deg: f64) -> f64 {
    (to_deg - from_deg + 180.0).rem_euclid(360.0) - 180.0
}
