use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::normalize::normalize;

/// A joined attribute value; `None` is the missing sentinel.
pub type AttrValue = Option<f64>;

/// Opaque handle into the geometry provider's polygon storage. The engine
/// never dereferences it, only hands it back to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeometryRef(pub u64);

/// One polygon unit with a join-able display name.
///
/// Created once when geometry loads; `attributes` is mutated only by join
/// passes and regions are never removed during a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Stable geometry key, e.g. the provider's polygon id.
    pub id: String,
    /// Raw display name as the geometry source spelled it.
    pub name: String,
    /// Normalized join key, computed once from `name`.
    pub key: String,
    pub geometry: GeometryRef,
    #[serde(default)]
    pub attributes: HashMap<String, AttrValue>,
}

impl Region {
    pub fn new(id: impl Into<String>, name: impl Into<String>, geometry: GeometryRef) -> Self {
        let name = name.into();
        let key = normalize(&name);
        Self {
            id: id.into(),
            name,
            key,
            geometry,
            attributes: HashMap::new(),
        }
    }

    /// Stable hex id via CRC32 of the display name, for providers whose
    /// polygons carry no native id.
    pub fn derive_id(name: &str) -> String {
        format!("{:08x}", crc32fast::hash(name.as_bytes()))
    }

    /// Current value of `attribute`. `None` covers both "never joined" and
    /// the explicit missing sentinel.
    pub fn attribute(&self, attribute: &str) -> AttrValue {
        self.attributes.get(attribute).copied().flatten()
    }

    /// Whether some join pass attached `attribute`, missing or not.
    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attributes.contains_key(attribute)
    }
}
