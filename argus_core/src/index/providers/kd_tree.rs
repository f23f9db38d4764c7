// argus_core/src/index/providers/kd_tree.rs

use std::num::NonZeroUsize;

use tracing::debug;

use crate::error::{PerceptionError, Result};
use crate::index::providers::{coarse_sphere, SpatialIndexProvider};
use crate::objects::SpatialObject;
use crate::perception::PerceptionModel;
use crate::spatial::KdTree;

/// KD-tree backed provider. The tree is created lazily on the first update
/// and rebuilt wholesale on every update after that.
#[derive(Debug, Clone)]
pub struct KdTreeIndex {
    bucket_size: NonZeroUsize,
    tree: Option<KdTree<SpatialObject>>,
}

impl KdTreeIndex {
    pub fn new(bucket_size: usize) -> Result<Self> {
        let bucket_size = NonZeroUsize::new(bucket_size).ok_or_else(|| {
            PerceptionError::invalid("kd-tree bucket size must be at least 1, got 0")
        })?;
        Ok(Self {
            bucket_size,
            tree: None,
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.tree.is_some()
    }
}

impl SpatialIndexProvider for KdTreeIndex {
    fn name(&self) -> &'static str {
        "kd-tree"
    }

    fn update_all(&mut self, objects: Vec<SpatialObject>) {
        if self.tree.is_none() {
            debug!(
                "Initializing kd-tree index with bucket size {} on first update",
                self.bucket_size
            );
        }
        self.tree = Some(KdTree::build_with(objects, self.bucket_size));
    }

    fn query_in_range(&self, model: &dyn PerceptionModel) -> Vec<SpatialObject> {
        let (Some(tree), Some((center, radius_sqr))) = (&self.tree, coarse_sphere(model)) else {
            return Vec::new();
        };
        tree.query_range(&center, radius_sqr)
            .into_iter()
            .filter(|o| model.is_in_range(o))
            .cloned()
            .collect()
    }

    fn count(&self) -> usize {
        self.tree.as_ref().map_or(0, KdTree::len)
    }
}
