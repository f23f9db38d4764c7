// argus_core/src/perception/modifiers/bounding_box_occlusion.rs

use nalgebra::Vector3;
use rand::RngCore;

use super::{ModifierContext, PerceptionModifier};
use crate::geometry::{BoundingBox, Edge, Ray};
use crate::objects::SpatialObject;

/// Upper bound on `points_per_side`.
pub const MAX_POINTS_PER_SIDE: u32 = 1024;

/// Footprint-based occlusion.
///
/// Each candidate is sampled with `points_per_side` points on every
/// footprint edge that faces the observer (shared corners are counted once).
/// The first two samples are the edge ends; the rest refine the edge by
/// repeated halving, so the samples taken for `n` points are always a subset
/// of those taken for `n + 1`. A sample is visible if its line of sight does not cross the
/// footprint of any other candidate. Candidates with fewer than
/// `detection_threshold` visible samples are dropped.
///
/// Objects without a footprint, such as traffic lights, are sampled at their
/// reference point only and need that single point to be visible.
#[derive(Debug, Clone)]
pub struct BoundingBoxOcclusion {
    points_per_side: u32,
    detection_threshold: u32,
}

/// Geometry of one candidate, computed once per `apply`.
struct Occluder {
    bounds: BoundingBox,
    edges: [Edge; 4],
}

impl BoundingBoxOcclusion {
    pub fn new(points_per_side: u32, detection_threshold: u32) -> Self {
        Self {
            points_per_side: points_per_side.clamp(2, MAX_POINTS_PER_SIDE),
            detection_threshold,
        }
    }

    /// Sample points on the observer-facing sides of `object`'s footprint.
    fn samples(&self, object: &SpatialObject, observer: &Vector3<f64>) -> Vec<Vector3<f64>> {
        let n = self.points_per_side;
        let mut points: Vec<Vector3<f64>> = Vec::new();
        for edge in object.footprint_edges() {
            let d = edge.b - edge.a;
            // Footprints wind counter-clockwise, so (dy, -dx) points outwards.
            let outward = Vector3::new(d.y, -d.x, 0.0);
            let to_observer = observer - edge.midpoint();
            if outward.x * to_observer.x + outward.y * to_observer.y <= 0.0 {
                continue;
            }
            for i in 0..n {
                let p = match i {
                    0 => edge.a,
                    1 => edge.b,
                    _ => edge.lerp(refinement(i - 1)),
                };
                if !points.contains(&p) {
                    points.push(p);
                }
            }
        }
        points
    }

    fn is_occluded(
        observer: &Vector3<f64>,
        sample: &Vector3<f64>,
        target: usize,
        occluders: &[Occluder],
    ) -> bool {
        let sightline = Edge::new(*observer, *sample);
        let ray = Ray::through(*observer, *sample);
        let sample_dist_sqr = (sample - observer).norm_squared();
        occluders.iter().enumerate().any(|(i, occluder)| {
            i != target
                && occluder.bounds.hit_distance_sqr(&ray) < sample_dist_sqr
                && occluder.edges.iter().any(|e| sightline.is_crossed_by(e))
        })
    }
}

/// Base-2 radical inverse of `k`: 1/2, 1/4, 3/4, 1/8, 5/8, ...
///
/// Every value is an exact binary fraction, so the same `k` always yields
/// the same point on an edge.
fn refinement(mut k: u32) -> f64 {
    let mut t = 0.0;
    let mut scale = 0.5;
    while k > 0 {
        if k & 1 == 1 {
            t += scale;
        }
        k >>= 1;
        scale *= 0.5;
    }
    t
}

impl PerceptionModifier for BoundingBoxOcclusion {
    fn name(&self) -> &'static str {
        "BoundingBoxOcclusion"
    }

    fn apply(
        &self,
        ctx: &ModifierContext,
        objects: Vec<SpatialObject>,
        _rng: &mut dyn RngCore,
    ) -> Vec<SpatialObject> {
        let observer = ctx.observer();
        let occluders: Vec<Occluder> = objects
            .iter()
            .map(|o| Occluder {
                bounds: o.bounding_box(),
                edges: o.footprint_edges(),
            })
            .collect();

        let visible: Vec<bool> = objects
            .iter()
            .enumerate()
            .map(|(i, object)| {
                let mut samples = self.samples(object, observer);
                let required = if samples.is_empty() {
                    samples.push(*object.position());
                    self.detection_threshold.min(1)
                } else {
                    self.detection_threshold
                };
                let seen = samples
                    .iter()
                    .filter(|s| !Self::is_occluded(observer, s, i, &occluders))
                    .count();
                seen as u32 >= required
            })
            .collect();

        objects
            .into_iter()
            .zip(visible)
            .filter_map(|(o, keep)| keep.then_some(o))
            .collect()
    }
}
