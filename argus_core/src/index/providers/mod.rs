// argus_core/src/index/providers/mod.rs

//! Per-kind spatial providers. Each provider owns the canonical snapshot of
//! one object kind and answers coarse range queries on it.

use std::fmt::Debug;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::objects::SpatialObject;
use crate::perception::PerceptionModel;

// --- The Provider Trait ("Contract") ---
/// The capability every index strategy offers, regardless of how it stores
/// its objects.
pub trait SpatialIndexProvider: Debug + Send + Sync {
    /// Short strategy name for logging.
    fn name(&self) -> &'static str;

    /// Replaces the entire working set. There is no incremental insert or
    /// delete; the backing structure is rebuilt from scratch.
    fn update_all(&mut self, objects: Vec<SpatialObject>);

    /// Copies of all objects accepted by `model`. Never hands out references
    /// into the backing storage.
    fn query_in_range(&self, model: &dyn PerceptionModel) -> Vec<SpatialObject>;

    /// Number of indexed objects.
    fn count(&self) -> usize;
}

// --- Configuration ---
/// Selects the container strategy for one object kind.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "PascalCase")]
pub enum IndexConfig {
    KdTree {
        #[serde(default = "default_bucket_size")]
        bucket_size: usize,
    },
    Grid {
        cell_size: f64,
    },
    Linear,
    /// No provider: queries against this kind are always empty.
    #[default]
    None,
}

fn default_bucket_size() -> usize {
    20
}

impl IndexConfig {
    /// Validates the configuration and creates the matching provider.
    pub fn build(&self) -> Result<Box<dyn SpatialIndexProvider>> {
        Ok(match self {
            IndexConfig::KdTree { bucket_size } => Box::new(KdTreeIndex::new(*bucket_size)?),
            IndexConfig::Grid { cell_size } => Box::new(GridIndex::new(*cell_size)?),
            IndexConfig::Linear => Box::new(LinearIndex::default()),
            IndexConfig::None => Box::new(NoneIndex),
        })
    }
}

/// Center and squared radius of the sphere enclosing the model's coarse box.
/// Overestimates the region on purpose; `is_in_range` does the fine check.
pub(crate) fn coarse_sphere(model: &dyn PerceptionModel) -> Option<(Vector3<f64>, f64)> {
    let bb = model.bounding_box();
    if bb.is_empty() {
        return None;
    }
    Some((bb.center, (bb.center - bb.min).norm_squared()))
}

// --- Declare the implementation sub-modules ---
mod grid;
mod kd_tree;
mod linear;
mod none;

// --- Re-export the public structs for a clean API ---
pub use grid::GridIndex;
pub use kd_tree::KdTreeIndex;
pub use linear::LinearIndex;
pub use none::NoneIndex;
