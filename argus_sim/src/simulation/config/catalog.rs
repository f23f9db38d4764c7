// argus_sim/src/simulation/config/catalog.rs

//! Loads every vehicle-type definition below a catalog directory.

use std::collections::BTreeMap;
use std::path::Path;

use argus_core::objects::VehicleType;
use figment::{
    providers::{Format, Toml},
    Figment,
};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::SimError;

/// Parsed vehicle types keyed by namespace (e.g. `vehicle_types.sedan` for
/// `<catalog>/vehicle_types/sedan.toml`).
#[derive(Debug, Clone, Default)]
pub struct VehicleCatalog(BTreeMap<String, VehicleType>);

impl VehicleCatalog {
    /// Walks `root` and parses every `.toml` file in it. A missing directory
    /// yields an empty catalog; a malformed file is an error.
    pub fn load(root: &Path) -> Result<Self, SimError> {
        let mut catalog = Self::default();
        if !root.exists() {
            warn!(
                "Catalog directory not found at {:?}, no vehicle types will be loaded.",
                root
            );
            return Ok(catalog);
        }

        info!("Loading vehicle catalog from: {:?}", root);
        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| {
                !e.file_type().is_dir() && e.path().extension().is_some_and(|ext| ext == "toml")
            })
        {
            let path = entry.path();
            let Some(key) = catalog_key(root, path) else {
                continue;
            };
            let vehicle_type: VehicleType = Figment::new()
                .merge(Toml::file(path))
                .extract()
                .map_err(|source| SimError::Catalog {
                    path: path.to_path_buf(),
                    source,
                })?;
            debug!("Loaded catalog item: '{}'", key);
            catalog.insert(key, vehicle_type);
        }
        info!("Loaded {} vehicle types", catalog.len());
        Ok(catalog)
    }

    pub fn insert(&mut self, key: impl Into<String>, vehicle_type: VehicleType) {
        self.0.insert(key.into(), vehicle_type);
    }

    pub fn get(&self, key: &str) -> Option<&VehicleType> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// `vehicle_types/sedan.toml` below `root` becomes `vehicle_types.sedan`.
fn catalog_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?.with_extension("");
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use argus_core::objects::VehicleClass;
    use std::fs;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_key_is_dotted_relative_path() {
        let root = Path::new("assets/catalog");
        assert_eq!(
            catalog_key(root, &root.join("vehicle_types").join("bus.toml")).as_deref(),
            Some("vehicle_types.bus")
        );
        assert_eq!(catalog_key(root, Path::new("elsewhere/bus.toml")), None);
    }

    #[test]
    fn test_load_nested_catalog() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "vehicle_types/sedan.toml",
            "name = \"sedan\"\nlength = 4.6\nwidth = 1.8\nheight = 1.45\n",
        );
        write(
            dir.path(),
            "vehicle_types/heavy/truck.toml",
            "name = \"truck\"\nlength = 12.0\nwidth = 2.55\nheight = 3.8\nvehicle_class = \"Truck\"\n",
        );
        write(dir.path(), "README.md", "not a catalog item");

        let catalog = VehicleCatalog::load(dir.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.keys().collect::<Vec<_>>(),
            vec!["vehicle_types.heavy.truck", "vehicle_types.sedan"]
        );
        let truck = catalog.get("vehicle_types.heavy.truck").unwrap();
        assert_eq!(truck.vehicle_class, VehicleClass::Truck);
        assert_eq!(truck.length, 12.0);
    }

    #[test]
    fn test_malformed_item_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "vehicle_types/bad.toml", "name = \"bad\"\nwheels = 3\n");
        let result = VehicleCatalog::load(dir.path());
        assert!(matches!(result, Err(SimError::Catalog { .. })));
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let catalog = VehicleCatalog::load(Path::new("no/such/catalog")).unwrap();
        assert!(catalog.is_empty());
    }
}
