// argus_core/src/perception/modifiers/dimensions.rs

use rand::RngCore;
use rand_distr::{Distribution, Normal};

use super::position::noise;
use super::{ModifierContext, PerceptionModifier};
use crate::error::Result;
use crate::objects::{Dimensions, SpatialObject};

/// Gaussian error on vehicle length, width and height, clamped at zero.
/// Resizing keeps the footprint centre fixed, so a length change also moves
/// the front-bumper reference point.
#[derive(Debug, Clone)]
pub struct DimensionsModifier {
    length: Normal<f64>,
    width: Normal<f64>,
    height: Normal<f64>,
}

impl DimensionsModifier {
    pub fn new(length_std_dev: f64, width_std_dev: f64, height_std_dev: f64) -> Result<Self> {
        Ok(Self {
            length: noise("length_std_dev", length_std_dev)?,
            width: noise("width_std_dev", width_std_dev)?,
            height: noise("height_std_dev", height_std_dev)?,
        })
    }
}

impl PerceptionModifier for DimensionsModifier {
    fn name(&self) -> &'static str {
        "DimensionsModifier"
    }

    fn apply(
        &self,
        ctx: &ModifierContext,
        mut objects: Vec<SpatialObject>,
        rng: &mut dyn RngCore,
    ) -> Vec<SpatialObject> {
        for object in objects.iter_mut().filter(|o| o.is_vehicle()) {
            let d = *object.dimensions();
            let noisy = Dimensions::new(
                (d.length + self.length.sample(rng)).max(0.0),
                (d.width + self.width.sample(rng)).max(0.0),
                (d.height + self.height.sample(rng)).max(0.0),
            );
            object.set_dimensions(noisy, ctx.projection);
        }
        objects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perception::modifiers::test_support::{car, context};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_length_noise_moves_bumper() {
        let objects: Vec<_> = (0..20).map(|i| car(&format!("v{i}"), i as f64, 0.0, 90.0)).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let out = DimensionsModifier::new(1.0, 0.0, 0.0)
            .unwrap()
            .apply(&context(&[]), objects.clone(), &mut rng);
        for (before, after) in objects.iter().zip(&out) {
            assert_ne!(before.length(), after.length());
            assert_eq!(before.dimensions().width, after.dimensions().width);
            assert_ne!(before.position(), after.position());
        }
    }

    #[test]
    fn test_dimensions_never_go_negative() {
        let objects = vec![car("v", 0.0, 10.0, 0.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..50 {
            let out = DimensionsModifier::new(10.0, 10.0, 10.0)
                .unwrap()
                .apply(&context(&[]), objects.clone(), &mut rng);
            let d = out[0].dimensions();
            assert!(d.length >= 0.0 && d.width >= 0.0 && d.height >= 0.0);
        }
    }
}
