// argus_core/src/spatial/kd_tree.rs

use std::num::NonZeroUsize;

use nalgebra::Vector3;

use super::Positioned;
use crate::error::{PerceptionError, Result};
use crate::geometry::BoundingBox;

#[derive(Debug, Clone)]
enum KdNode {
    /// Items `start..end` of the tree's backing storage.
    Leaf {
        bounds: BoundingBox,
        start: usize,
        end: usize,
    },
    Branch {
        bounds: BoundingBox,
        left: usize,
        right: usize,
    },
}

impl KdNode {
    fn bounds(&self) -> &BoundingBox {
        match self {
            KdNode::Leaf { bounds, .. } | KdNode::Branch { bounds, .. } => bounds,
        }
    }
}

/// A bulk-built KD-tree over item reference points.
///
/// Each inner node splits its items at the median of the axis with the
/// largest spread; leaves hold at most `bucket_size` items. The tree is never
/// updated in place: a new tick means a new tree.
#[derive(Debug, Clone)]
pub struct KdTree<T> {
    items: Vec<T>,
    nodes: Vec<KdNode>,
    bucket_size: usize,
}

impl<T: Positioned> KdTree<T> {
    /// Builds a balanced tree over `items`. Identical input order yields an
    /// identical tree.
    pub fn build(items: Vec<T>, bucket_size: usize) -> Result<Self> {
        let bucket_size = NonZeroUsize::new(bucket_size).ok_or_else(|| {
            PerceptionError::invalid("kd-tree bucket size must be at least 1, got 0")
        })?;
        Ok(Self::build_with(items, bucket_size))
    }

    /// Infallible variant of [`build`](Self::build) for an already validated
    /// bucket size.
    pub fn build_with(mut items: Vec<T>, bucket_size: NonZeroUsize) -> Self {
        let bucket_size = bucket_size.get();
        let mut nodes = Vec::new();
        if !items.is_empty() {
            build_node(&mut items, 0, bucket_size, &mut nodes);
        }
        Self {
            items,
            nodes,
            bucket_size,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn bucket_size(&self) -> usize {
        self.bucket_size
    }

    /// Bounds of all indexed reference points.
    pub fn bounds(&self) -> BoundingBox {
        self.nodes
            .first()
            .map(|n| *n.bounds())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// All items whose squared distance to `center` is at most `radius_sqr`.
    pub fn query_range(&self, center: &Vector3<f64>, radius_sqr: f64) -> Vec<&T> {
        let mut result = Vec::new();
        if self.nodes.is_empty() {
            return result;
        }
        let mut stack = vec![0usize];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if node.bounds().distance_sqr_to(center) > radius_sqr {
                continue;
            }
            match *node {
                KdNode::Leaf { start, end, .. } => {
                    result.extend(
                        self.items[start..end]
                            .iter()
                            .filter(|item| (item.point() - center).norm_squared() <= radius_sqr),
                    );
                }
                KdNode::Branch { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        result
    }

    /// Number of levels from the root to the deepest leaf.
    pub fn depth(&self) -> usize {
        fn depth_of(nodes: &[KdNode], idx: usize) -> usize {
            match nodes[idx] {
                KdNode::Leaf { .. } => 1,
                KdNode::Branch { left, right, .. } => {
                    1 + depth_of(nodes, left).max(depth_of(nodes, right))
                }
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            depth_of(&self.nodes, 0)
        }
    }
}

/// Recursively partitions `items` (which start at `offset` in the backing
/// storage) and returns the index of the created node.
fn build_node<T: Positioned>(
    items: &mut [T],
    offset: usize,
    bucket_size: usize,
    nodes: &mut Vec<KdNode>,
) -> usize {
    let bounds = BoundingBox::from_points(items.iter().map(Positioned::point));
    let idx = nodes.len();
    if items.len() <= bucket_size {
        nodes.push(KdNode::Leaf {
            bounds,
            start: offset,
            end: offset + items.len(),
        });
        return idx;
    }

    let axis = dominant_axis(&bounds);
    let mid = items.len() / 2;
    items.select_nth_unstable_by(mid, |a, b| a.point()[axis].total_cmp(&b.point()[axis]));

    // Reserve the slot so children land after their parent.
    nodes.push(KdNode::Leaf {
        bounds,
        start: offset,
        end: offset,
    });
    let (lower, upper) = items.split_at_mut(mid);
    let left = build_node(lower, offset, bucket_size, nodes);
    let right = build_node(upper, offset + mid, bucket_size, nodes);
    nodes[idx] = KdNode::Branch {
        bounds,
        left,
        right,
    };
    idx
}

fn dominant_axis(bounds: &BoundingBox) -> usize {
    let s = bounds.size;
    if s.x >= s.y && s.x >= s.z {
        0
    } else if s.y >= s.z {
        1
    } else {
        2
    }
}
