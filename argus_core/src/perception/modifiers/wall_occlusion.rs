// argus_core/src/perception/modifiers/wall_occlusion.rs

use rand::RngCore;

use super::{ModifierContext, PerceptionModifier};
use crate::geometry::Edge;
use crate::objects::SpatialObject;

/// Removes every object whose line of sight from the observer crosses one of
/// the observer's surrounding walls. Without walls this is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct WallOcclusion;

impl PerceptionModifier for WallOcclusion {
    fn name(&self) -> &'static str {
        "WallOcclusion"
    }

    fn apply(
        &self,
        ctx: &ModifierContext,
        objects: Vec<SpatialObject>,
        _rng: &mut dyn RngCore,
    ) -> Vec<SpatialObject> {
        if ctx.walls.is_empty() {
            return objects;
        }
        objects
            .into_iter()
            .filter(|o| {
                let sightline = Edge::new(*ctx.observer(), *o.position());
                !ctx.walls.iter().any(|wall| sightline.is_crossed_by(wall))
            })
            .collect()
    }
}
