// argus_core/src/spatial/grid.rs

use std::collections::HashMap;

use nalgebra::Vector3;

use super::Positioned;
use crate::error::{PerceptionError, Result};

type CellKey = (i64, i64);

/// A uniform grid over the XY plane. Cheaper to rebuild than a KD-tree and a
/// good fit for dense, evenly spread vehicle populations.
#[derive(Debug, Clone)]
pub struct SpatialGrid<T> {
    items: Vec<T>,
    cells: HashMap<CellKey, Vec<usize>>,
    cell_size: f64,
}

impl<T: Positioned> SpatialGrid<T> {
    pub fn build(items: Vec<T>, cell_size: f64) -> Result<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(PerceptionError::invalid(format!(
                "grid cell size must be a positive number, got {cell_size}"
            )));
        }
        Ok(Self::build_with(items, cell_size))
    }

    /// Builds without validating `cell_size`; callers must have checked it.
    pub(crate) fn build_with(items: Vec<T>, cell_size: f64) -> Self {
        let mut cells: HashMap<CellKey, Vec<usize>> = HashMap::new();
        for (i, item) in items.iter().enumerate() {
            cells.entry(cell_of(item.point(), cell_size)).or_default().push(i);
        }
        Self {
            items,
            cells,
            cell_size,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// All items whose squared distance to `center` is at most `radius_sqr`,
    /// in insertion order.
    pub fn query_range(&self, center: &Vector3<f64>, radius_sqr: f64) -> Vec<&T> {
        if self.items.is_empty() || radius_sqr < 0.0 {
            return Vec::new();
        }
        let radius = radius_sqr.sqrt();
        let (x0, y0) = cell_of(&(center - Vector3::new(radius, radius, 0.0)), self.cell_size);
        let (x1, y1) = cell_of(&(center + Vector3::new(radius, radius, 0.0)), self.cell_size);

        // Saturated keys from huge radii make the span overflow i64.
        let covered = span(x0, x1)
            .zip(span(y0, y1))
            .and_then(|(w, h)| w.checked_mul(h))
            .and_then(|c| usize::try_from(c).ok());
        let mut hits: Vec<usize> = if covered.map_or(true, |c| c > self.cells.len()) {
            // The query covers more cells than exist; walk the occupied ones.
            self.cells
                .iter()
                .filter(|((cx, cy), _)| (x0..=x1).contains(cx) && (y0..=y1).contains(cy))
                .flat_map(|(_, idx)| idx.iter().copied())
                .collect()
        } else {
            (x0..=x1)
                .flat_map(|cx| (y0..=y1).map(move |cy| (cx, cy)))
                .filter_map(|key| self.cells.get(&key))
                .flat_map(|idx| idx.iter().copied())
                .collect()
        };
        hits.retain(|&i| (self.items[i].point() - center).norm_squared() <= radius_sqr);
        hits.sort_unstable();
        hits.into_iter().map(|i| &self.items[i]).collect()
    }
}

/// Number of cells in `lo..=hi`, if it fits in an i64.
fn span(lo: i64, hi: i64) -> Option<i64> {
    hi.checked_sub(lo)?.checked_add(1)
}

fn cell_of(p: &Vector3<f64>, cell_size: f64) -> CellKey {
    (
        (p.x / cell_size).floor() as i64,
        (p.y / cell_size).floor() as i64,
    )
}
