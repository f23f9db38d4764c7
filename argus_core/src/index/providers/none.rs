// argus_core/src/index/providers/none.rs

use crate::index::providers::SpatialIndexProvider;
use crate::objects::SpatialObject;
use crate::perception::PerceptionModel;

/// A placeholder provider for object kinds the scenario does not index.
/// Updates are discarded and every query comes back empty.
#[derive(Default, Debug, Clone)]
pub struct NoneIndex;

impl SpatialIndexProvider for NoneIndex {
    fn name(&self) -> &'static str {
        "none"
    }

    fn update_all(&mut self, _objects: Vec<SpatialObject>) {
        // No-op
    }

    fn query_in_range(&self, _model: &dyn PerceptionModel) -> Vec<SpatialObject> {
        Vec::new()
    }

    fn count(&self) -> usize {
        0
    }
}
