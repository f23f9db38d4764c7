// argus_sim/src/simulation/utils/serde_helpers.rs

/// `[x, y, z]` arrays in scenario files as `Vector3<f64>`.
pub mod vec3_from_array {
    use nalgebra::Vector3;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(vec: &Vector3<f64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq([vec.x, vec.y, vec.z].iter())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vector3<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let arr: [f64; 3] = Deserialize::deserialize(deserializer)?;
        Ok(Vector3::new(arr[0], arr[1], arr[2]))
    }
}

/// `[x1, y1, x2, y2]` ground-plane segments as [`Edge`](argus_core::geometry::Edge)s.
pub mod edges_from_arrays {
    use argus_core::geometry::Edge;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(edges: &[Edge], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(edges.iter().map(|e| [e.a.x, e.a.y, e.b.x, e.b.y]))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Edge>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let arrays: Vec<[f64; 4]> = Deserialize::deserialize(deserializer)?;
        Ok(arrays
            .into_iter()
            .map(|[x1, y1, x2, y2]| Edge::xy(x1, y1, x2, y2))
            .collect())
    }
}
