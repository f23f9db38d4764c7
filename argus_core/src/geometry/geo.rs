// argus_core/src/geometry/geo.rs

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Mean earth radius in metres.
const EARTH_RADIUS: f64 = 6_371_008.8;

/// A WGS84-style geographic position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

/// Local tangent-plane projection between the projected ENU frame used by the
/// index and geographic coordinates.
///
/// Accurate to well under a metre within a few kilometres of the origin, which
/// covers any single simulation scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoProjection {
    pub origin_latitude: f64,
    pub origin_longitude: f64,
}

impl Default for GeoProjection {
    fn default() -> Self {
        Self {
            origin_latitude: 52.5,
            origin_longitude: 13.4,
        }
    }
}

impl GeoProjection {
    pub fn new(origin_latitude: f64, origin_longitude: f64) -> Self {
        Self {
            origin_latitude,
            origin_longitude,
        }
    }

    pub fn cartesian_to_geo(&self, p: &Vector3<f64>) -> GeoPoint {
        let lat0 = self.origin_latitude.to_radians();
        GeoPoint {
            latitude: self.origin_latitude + (p.y / EARTH_RADIUS).to_degrees(),
            longitude: self.origin_longitude + (p.x / (EARTH_RADIUS * lat0.cos())).to_degrees(),
            altitude: p.z,
        }
    }

    pub fn geo_to_cartesian(&self, g: &GeoPoint) -> Vector3<f64> {
        let lat0 = self.origin_latitude.to_radians();
        Vector3::new(
            (g.longitude - self.origin_longitude).to_radians() * EARTH_RADIUS * lat0.cos(),
            (g.latitude - self.origin_latitude).to_radians() * EARTH_RADIUS,
            g.altitude,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_origin_maps_to_origin() {
        let proj = GeoProjection::new(48.0, 11.0);
        let g = proj.cartesian_to_geo(&Vector3::zeros());
        assert_abs_diff_eq!(g.latitude, 48.0);
        assert_abs_diff_eq!(g.longitude, 11.0);
    }

    #[test]
    fn test_north_offset_changes_latitude_only() {
        let proj = GeoProjection::default();
        let g = proj.cartesian_to_geo(&Vector3::new(0.0, 1000.0, 2.0));
        assert!(g.latitude > proj.origin_latitude);
        assert_abs_diff_eq!(g.longitude, proj.origin_longitude);
        assert_abs_diff_eq!(g.altitude, 2.0);

        let back = proj.geo_to_cartesian(&g);
        assert_abs_diff_eq!(back.y, 1000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(back.x, 0.0, epsilon = 1e-6);
    }
}
