// argus_core/src/perception/modifiers/simple_occlusion.rs

use rand::RngCore;

use super::{sightline_direction, ModifierContext, PerceptionModifier};
use crate::objects::SpatialObject;

/// Cheap density-based occlusion.
///
/// For every candidate the modifier counts the other candidates that sit
/// closer to the observer and inside a corridor of `corridor_width` metres
/// centred on the line of sight. More than `max_occluders` of them hide the
/// candidate.
#[derive(Debug, Clone)]
pub struct SimpleOcclusion {
    corridor_width: f64,
    max_occluders: u32,
}

impl SimpleOcclusion {
    pub fn new(corridor_width: f64, max_occluders: u32) -> Self {
        Self {
            corridor_width,
            max_occluders,
        }
    }

    fn occluders(&self, ctx: &ModifierContext, target: usize, objects: &[SpatialObject]) -> u32 {
        let observer = ctx.observer();
        let target_pos = objects[target].position();
        let Some(dir) = sightline_direction(observer, target_pos) else {
            return 0;
        };
        let target_dist = (target_pos.xy() - observer.xy()).norm();
        let half_width = self.corridor_width * 0.5;

        let mut count = 0;
        for (i, other) in objects.iter().enumerate() {
            if i == target {
                continue;
            }
            let rel = other.position() - observer;
            let along = rel.x * dir.x + rel.y * dir.y;
            if along <= 0.0 || along >= target_dist {
                continue;
            }
            let lateral = (rel.x * dir.y - rel.y * dir.x).abs();
            if lateral <= half_width {
                count += 1;
            }
        }
        count
    }
}

impl PerceptionModifier for SimpleOcclusion {
    fn name(&self) -> &'static str {
        "SimpleOcclusion"
    }

    fn apply(
        &self,
        ctx: &ModifierContext,
        objects: Vec<SpatialObject>,
        _rng: &mut dyn RngCore,
    ) -> Vec<SpatialObject> {
        let visible: Vec<bool> = (0..objects.len())
            .map(|i| self.occluders(ctx, i, &objects) <= self.max_occluders)
            .collect();
        objects
            .into_iter()
            .zip(visible)
            .filter_map(|(o, keep)| keep.then_some(o))
            .collect()
    }
}
