// argus_core/src/index/providers/linear.rs

use crate::index::providers::{coarse_sphere, SpatialIndexProvider};
use crate::objects::SpatialObject;
use crate::perception::PerceptionModel;

/// Plain scan over all objects. For small populations (a handful of traffic
/// lights) this beats building any tree.
#[derive(Default, Debug, Clone)]
pub struct LinearIndex {
    objects: Vec<SpatialObject>,
}

impl SpatialIndexProvider for LinearIndex {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn update_all(&mut self, objects: Vec<SpatialObject>) {
        self.objects = objects;
    }

    fn query_in_range(&self, model: &dyn PerceptionModel) -> Vec<SpatialObject> {
        let Some((center, radius_sqr)) = coarse_sphere(model) else {
            return Vec::new();
        };
        self.objects
            .iter()
            .filter(|o| o.distance_sqr_to(&center) <= radius_sqr && model.is_in_range(o))
            .cloned()
            .collect()
    }

    fn count(&self) -> usize {
        self.objects.len()
    }
}
