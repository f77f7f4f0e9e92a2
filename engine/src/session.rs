use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use choromap_shared::{JoinResult, JoinSpec, SourceRow, join};

use crate::config::SessionConfig;
use crate::error::{SessionError, UpdateError};
use crate::geometry::GeometryProvider;
use crate::render::RenderBridge;
use crate::state::MapState;

/// One tabular dataset queued for joining at session setup. Rows arrive
/// already parsed; fetching and CSV handling happen upstream.
#[derive(Debug, Clone)]
pub struct TabularSource {
    pub name: String,
    pub rows: Vec<SourceRow>,
    pub join: JoinSpec,
}

/// Diagnostics for one completed join pass.
#[derive(Debug, Clone, Serialize)]
pub struct JoinPass {
    pub source: String,
    pub completed_at: DateTime<Utc>,
    pub result: JoinResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionDiagnostics {
    pub built_at: DateTime<Utc>,
    pub crs: String,
    pub passes: Vec<JoinPass>,
}

/// A live map session: the ready state plus the join diagnostics gathered
/// while building it.
#[derive(Debug)]
pub struct Session {
    state: MapState,
    diagnostics: SessionDiagnostics,
}

impl Session {
    /// Load geometry, attach every tabular source in order, then bring the
    /// map up: the initial selection is the first value field of the first
    /// source with the configured default palette, and the bridge receives
    /// one full paint. Join problems are diagnostics, not failures; a pass
    /// with conflicts or unmatched rows is logged and the build continues.
    pub fn build(
        provider: &dyn GeometryProvider,
        sources: &[TabularSource],
        config: SessionConfig,
        bridge: &mut dyn RenderBridge,
    ) -> Result<Session, SessionError> {
        let geometry = provider.load()?;
        if geometry.regions.is_empty() {
            return Err(SessionError::EmptyGeometry);
        }
        let initial_attribute = sources
            .iter()
            .find_map(|source| source.join.value_fields.first())
            .map(|field| field.field.clone())
            .ok_or(SessionError::NoSources)?;

        let mut regions = geometry.regions;
        let mut passes = Vec::with_capacity(sources.len());
        for source in sources {
            let result = join(&mut regions, &source.rows, &source.join);
            log_pass(&source.name, &result);
            passes.push(JoinPass {
                source: source.name.clone(),
                completed_at: Utc::now(),
                result,
            });
        }

        let crs = geometry.crs;
        let palette = config.default_palette.clone();
        let state = MapState::ready(
            crs.clone(),
            regions,
            &initial_attribute,
            &palette,
            config,
            bridge,
        )?;
        info!(crs = %state.crs(), attribute = %state.attribute(), palette = %state.palette(), "map session ready");

        Ok(Session {
            state,
            diagnostics: SessionDiagnostics {
                built_at: Utc::now(),
                crs,
                passes,
            },
        })
    }

    /// The single user-input event: switch the active attribute and/or
    /// palette. Handles rapid repeated firing because each call is fully
    /// applied (or fully rejected) before the next is read.
    pub fn attribute_or_palette_changed(
        &mut self,
        attribute: &str,
        palette: &str,
        bridge: &mut dyn RenderBridge,
    ) -> Result<(), UpdateError> {
        self.state.update(attribute, palette, bridge)
    }

    pub fn state(&self) -> &MapState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MapState {
        &mut self.state
    }

    pub fn diagnostics(&self) -> &SessionDiagnostics {
        &self.diagnostics
    }
}

fn log_pass(source: &str, result: &JoinResult) {
    if result.is_clean() {
        info!(source, matched = result.matched.len(), "joined tabular source");
    } else {
        warn!(
            source,
            matched = result.matched.len(),
            unmatched_regions = result.unmatched_regions.len(),
            unmatched_rows = result.unmatched_rows.len(),
            conflicts = result.conflicts.len(),
            "joined tabular source with diagnostics"
        );
    }
    debug!(
        source,
        detail = %serde_json::to_string(result).unwrap_or_default(),
        "join pass detail"
    );
}
