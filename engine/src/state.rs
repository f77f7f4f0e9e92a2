use tracing::debug;

use choromap_shared::label::format_label;
use choromap_shared::palette::Palette;
use choromap_shared::{ColorScale, Region};

use crate::config::SessionConfig;
use crate::error::UpdateError;
use crate::render::{RegionLabel, RenderBridge};

/// Fully computed replacement state for one `update` call, not yet
/// published. Committing a superseded generation is a no-op, so an
/// offloaded recomputation whose inputs were overtaken by a newer call
/// never reaches the bridge.
#[derive(Debug, Clone)]
pub struct PendingUpdate {
    generation: u64,
    attribute: String,
    palette: String,
    scale: ColorScale,
    labels: Vec<RegionLabel>,
}

/// Reactive controller for one map session.
///
/// Constructing it via [`MapState::ready`] is the one transition out of
/// uninitialized: the initial scale and labels are derived and the bridge
/// receives its single full `paint`. From then on the only mutation is
/// [`MapState::update`], which replaces scale and labels atomically — the
/// bridge never observes a new scale with old labels or vice versa.
#[derive(Debug)]
pub struct MapState {
    crs: String,
    regions: Vec<Region>,
    config: SessionConfig,
    attribute: String,
    palette: String,
    scale: ColorScale,
    labels: Vec<RegionLabel>,
    generation: u64,
}

impl MapState {
    pub fn ready(
        crs: String,
        regions: Vec<Region>,
        attribute: &str,
        palette: &str,
        config: SessionConfig,
        bridge: &mut dyn RenderBridge,
    ) -> Result<Self, UpdateError> {
        let (scale, labels) = derive(&regions, attribute, palette, &config)?;
        let state = Self {
            crs,
            regions,
            config,
            attribute: attribute.to_string(),
            palette: scale.palette.clone(),
            scale,
            labels,
            generation: 0,
        };
        bridge.paint(&state.crs, &state.regions, &state.scale, &state.labels);
        Ok(state)
    }

    pub fn crs(&self) -> &str {
        &self.crs
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn palette(&self) -> &str {
        &self.palette
    }

    pub fn scale(&self) -> &ColorScale {
        &self.scale
    }

    pub fn labels(&self) -> &[RegionLabel] {
        &self.labels
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Validate the selection and fully compute the state an update would
    /// publish. Fails without mutating anything the renderer can observe.
    pub fn stage_update(
        &mut self,
        attribute: &str,
        palette: &str,
    ) -> Result<PendingUpdate, UpdateError> {
        let (scale, labels) = derive(&self.regions, attribute, palette, &self.config)?;
        self.generation += 1;
        Ok(PendingUpdate {
            generation: self.generation,
            attribute: attribute.to_string(),
            palette: scale.palette.clone(),
            scale,
            labels,
        })
    }

    /// Publish a staged update unless a newer one was staged since
    /// (latest-wins). Returns whether the bridge was repainted.
    pub fn commit(&mut self, pending: PendingUpdate, bridge: &mut dyn RenderBridge) -> bool {
        if pending.generation != self.generation {
            debug!(
                staged = pending.generation,
                current = self.generation,
                "discarding superseded update"
            );
            return false;
        }
        self.attribute = pending.attribute;
        self.palette = pending.palette;
        self.scale = pending.scale;
        self.labels = pending.labels;
        bridge.repaint(&self.scale, &self.labels);
        true
    }

    /// Switch the active attribute and palette: recompute the scale and
    /// every label, then publish one repaint. Geometry and region identity
    /// are untouched. On error the previous state stays fully intact.
    pub fn update(
        &mut self,
        attribute: &str,
        palette: &str,
        bridge: &mut dyn RenderBridge,
    ) -> Result<(), UpdateError> {
        let pending = self.stage_update(attribute, palette)?;
        self.commit(pending, bridge);
        Ok(())
    }
}

fn derive(
    regions: &[Region],
    attribute: &str,
    palette_name: &str,
    config: &SessionConfig,
) -> Result<(ColorScale, Vec<RegionLabel>), UpdateError> {
    if !regions.iter().any(|region| region.has_attribute(attribute)) {
        return Err(UpdateError::UnknownAttribute(attribute.to_string()));
    }
    let palette = Palette::by_name(palette_name)
        .ok_or_else(|| UpdateError::UnknownPalette(palette_name.to_string()))?;

    let scale = ColorScale::build(regions, attribute, palette, &config.scale_options());
    let labels = regions
        .iter()
        .map(|region| RegionLabel {
            region_id: region.id.clone(),
            text: format_label(
                region,
                attribute,
                &config.label_template,
                &config.missing_placeholder,
            ),
        })
        .collect();
    Ok((scale, labels))
}
