// argus_core/src/perception/modifiers/distance_filter.rs

use rand::{Rng, RngCore};

use super::{ModifierContext, PerceptionModifier};
use crate::objects::SpatialObject;

/// Randomly drops objects with a probability that grows with distance:
/// `p = clamp(base + slope * distance / viewing_range, 0, 1)`.
///
/// One uniform sample is drawn per object regardless of the outcome, so the
/// random stream advances identically for a given input size.
#[derive(Debug, Clone)]
pub struct DistanceFilter {
    base: f64,
    slope: f64,
}

impl DistanceFilter {
    pub fn new(base: f64, slope: f64) -> Self {
        Self { base, slope }
    }

    pub fn drop_probability(&self, distance: f64, viewing_range: f64) -> f64 {
        let ratio = if viewing_range > 0.0 {
            distance / viewing_range
        } else {
            1.0
        };
        (self.base + self.slope * ratio).clamp(0.0, 1.0)
    }
}

impl PerceptionModifier for DistanceFilter {
    fn name(&self) -> &'static str {
        "DistanceFilter"
    }

    fn apply(
        &self,
        ctx: &ModifierContext,
        objects: Vec<SpatialObject>,
        rng: &mut dyn RngCore,
    ) -> Vec<SpatialObject> {
        objects
            .into_iter()
            .filter(|o| {
                let distance = o.distance_sqr_to(ctx.observer()).sqrt();
                let p = self.drop_probability(distance, ctx.viewing_range);
                rng.gen::<f64>() >= p
            })
            .collect()
    }
}
