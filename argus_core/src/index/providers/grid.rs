// argus_core/src/index/providers/grid.rs

use tracing::debug;

use crate::error::{PerceptionError, Result};
use crate::index::providers::{coarse_sphere, SpatialIndexProvider};
use crate::objects::SpatialObject;
use crate::perception::PerceptionModel;
use crate::spatial::SpatialGrid;

/// Uniform-grid backed provider, rebuilt on every update.
#[derive(Debug, Clone)]
pub struct GridIndex {
    cell_size: f64,
    grid: Option<SpatialGrid<SpatialObject>>,
}

impl GridIndex {
    pub fn new(cell_size: f64) -> Result<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(PerceptionError::invalid(format!(
                "grid cell size must be a positive number, got {cell_size}"
            )));
        }
        Ok(Self {
            cell_size,
            grid: None,
        })
    }
}

impl SpatialIndexProvider for GridIndex {
    fn name(&self) -> &'static str {
        "grid"
    }

    fn update_all(&mut self, objects: Vec<SpatialObject>) {
        let grid = SpatialGrid::build_with(objects, self.cell_size);
        debug!(
            "Rebuilt grid index: {} objects in {} cells of {} m",
            grid.len(),
            grid.occupied_cells(),
            self.cell_size
        );
        self.grid = Some(grid);
    }

    fn query_in_range(&self, model: &dyn PerceptionModel) -> Vec<SpatialObject> {
        let (Some(grid), Some((center, radius_sqr))) = (&self.grid, coarse_sphere(model)) else {
            return Vec::new();
        };
        grid.query_range(&center, radius_sqr)
            .into_iter()
            .filter(|o| model.is_in_range(o))
            .cloned()
            .collect()
    }

    fn count(&self) -> usize {
        self.grid.as_ref().map_or(0, SpatialGrid::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::providers::test_support::{row_of_vehicles, sorted_ids, SquareModel};
    use crate::perception::{ObserverPose, SimplePerceptionModel};
    use nalgebra::Vector3;

    #[test]
    fn test_invalid_cell_size_rejected() {
        assert!(GridIndex::new(0.0).is_err());
        assert!(GridIndex::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_grid_query() {
        let mut index = GridIndex::new(7.5).unwrap();
        assert!(index.query_in_range(&SquareModel { half: 1e3 }).is_empty());
        index.update_all(row_of_vehicles(20, 10.0));
        assert_eq!(index.count(), 20);
        let hits = index.query_in_range(&SquareModel { half: 15.0 });
        assert_eq!(sorted_ids(&hits), vec!["veh_0", "veh_1"]);
    }

    #[test]
    fn test_huge_viewing_range() {
        let mut index = GridIndex::new(1.0).unwrap();
        index.update_all(row_of_vehicles(5, 10.0));
        let pose = ObserverPose::new(Vector3::zeros(), 90.0);
        let model = SimplePerceptionModel::new("ego", pose, 360.0, 1e19);
        assert_eq!(index.query_in_range(&model).len(), 5);
    }
}
