use serde::{Deserialize, Serialize};

use choromap_shared::{ColorScale, Region};

/// Display string for one region under the current attribute selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionLabel {
    pub region_id: String,
    pub text: String,
}

/// The renderer the engine drives, implemented by the excluded rendering
/// engine. `paint` happens once per session when the map becomes ready;
/// `repaint` reuses the existing geometry placement and carries only what
/// an attribute or palette switch can change. The engine never calls
/// geometry-loading operations on the render side.
pub trait RenderBridge {
    fn paint(&mut self, crs: &str, regions: &[Region], scale: &ColorScale, labels: &[RegionLabel]);
    fn repaint(&mut self, scale: &ColorScale, labels: &[RegionLabel]);
}
