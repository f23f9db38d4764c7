// argus_core/src/geometry/edge.rs

use nalgebra::Vector3;

/// Tolerance used for parallelism and endpoint checks in the XY plane.
const EPSILON: f64 = 1e-9;

/// A straight segment between two points, e.g. a building wall or one side of
/// a vehicle footprint. Intersection tests ignore the z component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub a: Vector3<f64>,
    pub b: Vector3<f64>,
}

impl Edge {
    pub fn new(a: Vector3<f64>, b: Vector3<f64>) -> Self {
        Self { a, b }
    }

    /// Convenience constructor for an edge lying on the ground plane.
    pub fn xy(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(Vector3::new(x1, y1, 0.0), Vector3::new(x2, y2, 0.0))
    }

    pub fn length(&self) -> f64 {
        (self.b - self.a).norm()
    }

    pub fn midpoint(&self) -> Vector3<f64> {
        (self.a + self.b) * 0.5
    }

    /// Point at fraction `t` between `a` (t = 0) and `b` (t = 1).
    pub fn lerp(&self, t: f64) -> Vector3<f64> {
        self.a + (self.b - self.a) * t
    }

    /// Parametric intersection of the XY projections of both segments.
    ///
    /// Returns `(t, u)` such that `self.lerp(t)` and `other.lerp(u)` coincide
    /// in the XY plane, with both parameters in `[0, 1]`. Parallel and
    /// collinear segments never intersect.
    pub fn intersection_xy(&self, other: &Edge) -> Option<(f64, f64)> {
        let r = self.b - self.a;
        let s = other.b - other.a;
        let denom = cross_xy(&r, &s);
        if denom.abs() < EPSILON {
            return None;
        }
        let qp = other.a - self.a;
        let t = cross_xy(&qp, &s) / denom;
        let u = cross_xy(&qp, &r) / denom;
        if (-EPSILON..=1.0 + EPSILON).contains(&t) && (-EPSILON..=1.0 + EPSILON).contains(&u) {
            Some((t, u))
        } else {
            None
        }
    }

    /// True if `other` crosses this segment strictly between its endpoints,
    /// i.e. touching only at `a` or `b` does not count.
    pub fn is_crossed_by(&self, other: &Edge) -> bool {
        self.intersection_xy(other)
            .is_some_and(|(t, _)| t > EPSILON && t < 1.0 - EPSILON)
    }
}

fn cross_xy(v: &Vector3<f64>, w: &Vector3<f64>) -> f64 {
    v.x * w.y - v.y * w.x
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_crossing_segments() {
        let a = Edge::xy(0.0, 0.0, 10.0, 0.0);
        let b = Edge::xy(5.0, -5.0, 5.0, 5.0);
        let (t, u) = a.intersection_xy(&b).expect("segments cross");
        assert_abs_diff_eq!(t, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(u, 0.5, epsilon = 1e-12);
        assert!(a.is_crossed_by(&b));
    }

    #[test]
    fn test_disjoint_and_parallel_segments() {
        let a = Edge::xy(0.0, 0.0, 10.0, 0.0);
        assert!(a.intersection_xy(&Edge::xy(5.0, 1.0, 5.0, 5.0)).is_none());
        assert!(a.intersection_xy(&Edge::xy(0.0, 1.0, 10.0, 1.0)).is_none());
        // Collinear overlap is treated as no intersection.
        assert!(a.intersection_xy(&Edge::xy(2.0, 0.0, 4.0, 0.0)).is_none());
    }

    #[test]
    fn test_touching_at_endpoint_is_not_a_crossing() {
        let sight = Edge::xy(0.0, 0.0, 10.0, 0.0);
        let wall = Edge::xy(10.0, -1.0, 10.0, 1.0);
        assert!(sight.intersection_xy(&wall).is_some());
        assert!(!sight.is_crossed_by(&wall));
    }

    #[test]
    fn test_z_is_ignored() {
        let a = Edge::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(10.0, 0.0, 3.0));
        let b = Edge::new(Vector3::new(5.0, -5.0, 8.0), Vector3::new(5.0, 5.0, 8.0));
        assert!(a.is_crossed_by(&b));
        assert_abs_diff_eq!(a.lerp(0.5).z, 1.5);
        assert_abs_diff_eq!(a.midpoint().x, 5.0);
    }
}
