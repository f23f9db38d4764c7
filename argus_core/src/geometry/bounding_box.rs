// argus_core/src/geometry/bounding_box.rs

use nalgebra::Vector3;

use super::Ray;

/// An axis-aligned bounding volume.
///
/// `size` and `center` are kept in sync with `min`/`max` on every mutation, so
/// reading them is free. A freshly created box is empty until the first point
/// is added; afterwards `min <= max` holds componentwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vector3<f64>,
    pub max: Vector3<f64>,
    pub size: Vector3<f64>,
    pub center: Vector3<f64>,
    is_empty: bool,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            min: Vector3::zeros(),
            max: Vector3::zeros(),
            size: Vector3::zeros(),
            center: Vector3::zeros(),
            is_empty: true,
        }
    }
}

impl BoundingBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Smallest box containing all given points.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vector3<f64>>) -> Self {
        let mut bb = Self::new();
        bb.add_points(points);
        bb
    }

    /// Box spanning `center ± half_extent` on every axis.
    pub fn around(center: Vector3<f64>, half_extent: Vector3<f64>) -> Self {
        let mut bb = Self::new();
        bb.add_points([&(center - half_extent), &(center + half_extent)]);
        bb
    }

    pub fn is_empty(&self) -> bool {
        self.is_empty
    }

    /// Resets the box to its initial, empty state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn extend(&mut self, point: &Vector3<f64>) {
        if self.is_empty {
            self.min = *point;
            self.max = *point;
            self.is_empty = false;
        } else {
            self.min = self.min.inf(point);
            self.max = self.max.sup(point);
        }
    }

    fn update_size_and_center(&mut self) {
        self.size = self.max - self.min;
        self.center = self.min + self.size * 0.5;
    }

    pub fn add_point(&mut self, point: &Vector3<f64>) {
        self.extend(point);
        self.update_size_and_center();
    }

    pub fn add_points<'a>(&mut self, points: impl IntoIterator<Item = &'a Vector3<f64>>) {
        for p in points {
            self.extend(p);
        }
        self.update_size_and_center();
    }

    /// Grows this box to also enclose `other`. Adding an empty box is a no-op.
    pub fn add_box(&mut self, other: &BoundingBox) {
        if other.is_empty {
            return;
        }
        self.extend(&other.min);
        self.extend(&other.max);
        self.update_size_and_center();
    }

    pub fn contains(&self, p: &Vector3<f64>) -> bool {
        !self.is_empty
            && p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Squared distance from `p` to the closest point of the box, 0 if inside.
    /// An empty box is infinitely far away (`f64::MAX`).
    pub fn distance_sqr_to(&self, p: &Vector3<f64>) -> f64 {
        if self.is_empty {
            return f64::MAX;
        }
        if self.contains(p) {
            return 0.0;
        }
        (0..3)
            .map(|i| {
                let d = if p[i] < self.min[i] {
                    p[i] - self.min[i]
                } else if p[i] > self.max[i] {
                    self.max[i] - p[i]
                } else {
                    0.0
                };
                d * d
            })
            .sum()
    }

    pub fn distance_to(&self, p: &Vector3<f64>) -> f64 {
        let sqr = self.distance_sqr_to(p);
        if sqr == f64::MAX {
            f64::MAX
        } else {
            sqr.sqrt()
        }
    }

    /// Squared distance the ray travels before it enters the box (slab method).
    ///
    /// Returns 0 if the ray starts inside the box, even with no direction.
    /// Otherwise returns `f64::MAX` if the box is missed or lies behind the
    /// origin, or if the ray has no direction.
    pub fn hit_distance_sqr(&self, ray: &Ray) -> f64 {
        if self.contains(&ray.origin) {
            return 0.0;
        }
        if self.is_empty || ray.is_degenerate() {
            return f64::MAX;
        }

        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;
        for axis in 0..3 {
            let Some((t0, t1)) = self.slab(ray, axis) else {
                return f64::MAX;
            };
            if t_min > t1 || t0 > t_max {
                return f64::MAX;
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
        }

        if t_min > 0.0 && t_min.is_finite() {
            (ray.direction * t_min).norm_squared()
        } else {
            f64::MAX
        }
    }

    /// Like [`hit_distance_sqr`](Self::hit_distance_sqr) but not squared.
    pub fn hit_distance(&self, ray: &Ray) -> f64 {
        let sqr = self.hit_distance_sqr(ray);
        if sqr == f64::MAX {
            f64::MAX
        } else {
            sqr.sqrt()
        }
    }

    /// Entry/exit parameters of the ray for the slab on `axis`.
    /// `None` if the ray runs parallel to the slab and outside of it.
    fn slab(&self, ray: &Ray, axis: usize) -> Option<(f64, f64)> {
        let o = ray.origin[axis];
        let d = ray.direction[axis];
        if d == 0.0 {
            return if o < self.min[axis] || o > self.max[axis] {
                None
            } else {
                Some((f64::NEG_INFINITY, f64::INFINITY))
            };
        }
        let div = 1.0 / d;
        if div >= 0.0 {
            Some(((self.min[axis] - o) * div, (self.max[axis] - o) * div))
        } else {
            Some(((self.max[axis] - o) * div, (self.min[axis] - o) * div))
        }
    }

    /// The eight corners of the box; empty boxes have none.
    pub fn corners(&self) -> Vec<Vector3<f64>> {
        if self.is_empty {
            return Vec::new();
        }
        let (lo, hi) = (self.min, self.max);
        vec![
            Vector3::new(lo.x, lo.y, lo.z),
            Vector3::new(hi.x, lo.y, lo.z),
            Vector3::new(hi.x, hi.y, lo.z),
            Vector3::new(lo.x, hi.y, lo.z),
            Vector3::new(lo.x, lo.y, hi.z),
            Vector3::new(hi.x, lo.y, hi.z),
            Vector3::new(hi.x, hi.y, hi.z),
            Vector3::new(lo.x, hi.y, hi.z),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn unit_box() -> BoundingBox {
        BoundingBox::from_points([&Vector3::new(0.0, 0.0, 0.0), &Vector3::new(1.0, 1.0, 1.0)])
    }

    #[test]
    fn test_new_box_is_empty_and_contains_nothing() {
        let bb = BoundingBox::new();
        assert!(bb.is_empty());
        assert!(!bb.contains(&Vector3::zeros()));
        assert_eq!(bb.distance_sqr_to(&Vector3::zeros()), f64::MAX);
        assert!(bb.corners().is_empty());
    }

    #[test]
    fn test_add_updates_size_and_center() {
        let mut bb = BoundingBox::new();
        bb.add_point(&Vector3::new(1.0, 2.0, 3.0));
        assert!(!bb.is_empty());
        assert_eq!(bb.size, Vector3::zeros());
        assert_eq!(bb.center, Vector3::new(1.0, 2.0, 3.0));

        bb.add_points([&Vector3::new(-1.0, 4.0, 3.0), &Vector3::new(3.0, 0.0, 5.0)]);
        assert_eq!(bb.min, Vector3::new(-1.0, 0.0, 3.0));
        assert_eq!(bb.max, Vector3::new(3.0, 4.0, 5.0));
        assert_eq!(bb.size, Vector3::new(4.0, 4.0, 2.0));
        assert_eq!(bb.center, Vector3::new(1.0, 2.0, 4.0));

        bb.clear();
        assert!(bb.is_empty());
    }

    #[test]
    fn test_add_box_merges_and_ignores_empty() {
        let mut bb = unit_box();
        bb.add_box(&BoundingBox::new());
        assert_eq!(bb, unit_box());

        let other = BoundingBox::around(Vector3::new(5.0, 5.0, 5.0), Vector3::new(1.0, 1.0, 1.0));
        bb.add_box(&other);
        assert_eq!(bb.min, Vector3::zeros());
        assert_eq!(bb.max, Vector3::new(6.0, 6.0, 6.0));
    }

    #[test]
    fn test_distance_sqr_to_point() {
        let bb = unit_box();
        assert_eq!(bb.distance_sqr_to(&Vector3::new(0.5, 0.5, 0.5)), 0.0);
        assert_abs_diff_eq!(bb.distance_sqr_to(&Vector3::new(3.0, 0.5, 0.5)), 4.0);
        assert_abs_diff_eq!(bb.distance_sqr_to(&Vector3::new(-1.0, -1.0, 0.5)), 2.0);
        assert_abs_diff_eq!(bb.distance_to(&Vector3::new(-3.0, 0.5, 5.0)), 5.0);
    }

    #[test]
    fn test_hit_distance_from_inside_is_zero() {
        let bb = unit_box();
        let ray = Ray::new(Vector3::new(0.5, 0.5, 0.5), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(bb.hit_distance_sqr(&ray), 0.0);
    }

    #[test]
    fn test_hit_distance_front_hit() {
        let bb = unit_box();
        let ray = Ray::new(Vector3::new(-2.0, 0.5, 0.5), Vector3::new(1.0, 0.0, 0.0));
        assert_abs_diff_eq!(bb.hit_distance_sqr(&ray), 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bb.hit_distance(&ray), 2.0, epsilon = 1e-12);

        // Unnormalized direction still yields the Euclidean distance.
        let diagonal = Ray::new(Vector3::new(-1.0, -1.0, 0.5), Vector3::new(3.0, 3.0, 0.0));
        assert_abs_diff_eq!(bb.hit_distance_sqr(&diagonal), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_hit_distance_miss_and_behind() {
        let bb = unit_box();
        let behind = Ray::new(Vector3::new(-2.0, 0.5, 0.5), Vector3::new(-1.0, 0.0, 0.0));
        assert_eq!(bb.hit_distance_sqr(&behind), f64::MAX);

        let miss = Ray::new(Vector3::new(-2.0, 3.0, 0.5), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(bb.hit_distance_sqr(&miss), f64::MAX);
        assert_eq!(bb.hit_distance(&miss), f64::MAX);
    }

    #[test]
    fn test_hit_distance_zero_direction() {
        let bb = unit_box();
        let ray = Ray::new(Vector3::new(-2.0, 0.5, 0.5), Vector3::zeros());
        assert_eq!(bb.hit_distance_sqr(&ray), f64::MAX);

        // Starting inside still counts as a hit at distance zero.
        let inside = Ray::new(Vector3::new(0.5, 0.5, 0.5), Vector3::zeros());
        assert_eq!(bb.hit_distance_sqr(&inside), 0.0);
        assert_eq!(bb.hit_distance(&inside), 0.0);
    }

    #[test]
    fn test_hit_distance_flat_box() {
        // Boxes of traffic lights or ground footprints may have zero height.
        let bb = BoundingBox::from_points([&Vector3::new(0.0, 0.0, 0.0), &Vector3::new(1.0, 1.0, 0.0)]);
        let ray = Ray::new(Vector3::new(-1.0, 0.5, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert_abs_diff_eq!(bb.hit_distance_sqr(&ray), 1.0, epsilon = 1e-12);
    }
}
