// argus_core/src/prelude.rs

// --- Core Abstractions ---
pub use crate::index::{IndexConfig, SpatialIndexProvider};
pub use crate::perception::{PerceptionModel, PerceptionModifier, PerceptionOwner};

// --- Core Data Structures ---
pub use crate::geometry::{BoundingBox, Edge, GeoPoint, GeoProjection, Ray};
pub use crate::objects::{
    Dimensions, ObjectKind, SpatialObject, TrafficLightSnapshot, TrafficLightState, VehicleClass,
    VehicleSnapshot, VehicleType,
};

// --- Index and Perception ---
pub use crate::error::{PerceptionError, Result};
pub use crate::index::TrafficObjectIndex;
pub use crate::perception::{
    ModifierConfig, ModifierSpec, ObserverPose, PerceptionConfig, PerceptionModule,
    SimplePerceptionModel,
};
