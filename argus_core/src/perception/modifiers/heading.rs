// argus_core/src/perception/modifiers/heading.rs

use rand::RngCore;
use rand_distr::{Distribution, Normal};

use super::position::noise;
use super::{ModifierContext, PerceptionModifier};
use crate::error::Result;
use crate::objects::SpatialObject;

/// Adds `bias + N(0, std_dev)` degrees to every vehicle's heading. The
/// vehicle rotates around its footprint centre, so its front-bumper position
/// moves as well. Other object kinds pass through untouched.
#[derive(Debug, Clone)]
pub struct HeadingModifier {
    error: Normal<f64>,
    bias: f64,
}

impl HeadingModifier {
    pub fn new(std_dev: f64, bias: f64) -> Result<Self> {
        Ok(Self {
            error: noise("std_dev", std_dev)?,
            bias,
        })
    }
}

impl PerceptionModifier for HeadingModifier {
    fn name(&self) -> &'static str {
        "HeadingModifier"
    }

    fn apply(
        &self,
        ctx: &ModifierContext,
        mut objects: Vec<SpatialObject>,
        rng: &mut dyn RngCore,
    ) -> Vec<SpatialObject> {
        for object in objects.iter_mut().filter(|o| o.is_vehicle()) {
            let heading = object.heading() + self.bias + self.error.sample(rng);
            object.set_heading(heading, ctx.projection);
        }
        objects
    }
}
