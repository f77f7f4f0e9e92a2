use serde::{Deserialize, Serialize};

use choromap_shared::Region;

use crate::error::GeometryError;

/// A loaded polygon set: regions plus the provider's declared coordinate
/// reference system, passed through to the renderer untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometrySet {
    pub crs: String,
    pub regions: Vec<Region>,
}

/// Source of named polygons. File parsing and projection live behind this
/// trait; the engine only sees stable ids, display names, and the CRS tag.
/// Whatever I/O an implementation performs happens inside `load`, strictly
/// before any join pass runs.
pub trait GeometryProvider {
    fn load(&self) -> Result<GeometrySet, GeometryError>;
}
