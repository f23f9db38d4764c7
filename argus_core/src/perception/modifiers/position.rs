// argus_core/src/perception/modifiers/position.rs

use nalgebra::Vector3;
use rand::RngCore;
use rand_distr::{Distribution, Normal};

use super::{sightline_direction, ModifierContext, PerceptionModifier};
use crate::error::{PerceptionError, Result};
use crate::objects::SpatialObject;

/// Gaussian position error, split into a component along the observer's line
/// of sight to the object and one perpendicular to it.
#[derive(Debug, Clone)]
pub struct PositionModifier {
    longitudinal: Normal<f64>,
    lateral: Normal<f64>,
}

impl PositionModifier {
    pub fn new(longitudinal_std_dev: f64, lateral_std_dev: f64) -> Result<Self> {
        Ok(Self {
            longitudinal: noise("longitudinal_std_dev", longitudinal_std_dev)?,
            lateral: noise("lateral_std_dev", lateral_std_dev)?,
        })
    }
}

/// Zero-mean normal distribution, rejecting invalid standard deviations.
pub(crate) fn noise(name: &str, std_dev: f64) -> Result<Normal<f64>> {
    Normal::new(0.0, std_dev).map_err(|e| {
        PerceptionError::invalid(format!("{name} = {std_dev} is not a valid standard deviation: {e}"))
    })
}

impl PerceptionModifier for PositionModifier {
    fn name(&self) -> &'static str {
        "PositionModifier"
    }

    fn apply(
        &self,
        ctx: &ModifierContext,
        mut objects: Vec<SpatialObject>,
        rng: &mut dyn RngCore,
    ) -> Vec<SpatialObject> {
        for object in objects.iter_mut() {
            let along = sightline_direction(ctx.observer(), object.position())
                .unwrap_or_else(|| object.forward());
            let across = Vector3::new(-along.y, along.x, 0.0);
            let offset = along * self.longitudinal.sample(rng) + across * self.lateral.sample(rng);
            let noisy = object.position() + offset;
            object.set_position(noisy, ctx.projection);
        }
        objects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perception::modifiers::test_support::{car, context};
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_negative_std_dev_is_rejected() {
        assert!(PositionModifier::new(-1.0, 1.0).is_err());
        assert!(PositionModifier::new(1.0, f64::NAN).is_err());
    }

    #[test]
    fn test_moves_every_object_and_keeps_count() {
        let objects: Vec<_> = (0..30).map(|i| car(&format!("v{i}"), i as f64, 5.0, 0.0)).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let out = PositionModifier::new(1.0, 1.0)
            .unwrap()
            .apply(&context(&[]), objects.clone(), &mut rng);
        assert_eq!(out.len(), objects.len());
        for (before, after) in objects.iter().zip(&out) {
            assert_eq!(before.id(), after.id());
            assert_ne!(before.position(), after.position());
            assert_ne!(before.geo_position(), after.geo_position());
        }
    }

    #[test]
    fn test_longitudinal_only_noise_stays_on_sightline() {
        let objects = vec![car("v", 30.0, 0.0, 0.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let out = PositionModifier::new(2.0, 0.0)
            .unwrap()
            .apply(&context(&[]), objects, &mut rng);
        assert_abs_diff_eq!(out[0].position().y, 0.0, epsilon = 1e-12);
        assert!(out[0].position().x != 30.0);
    }
}
