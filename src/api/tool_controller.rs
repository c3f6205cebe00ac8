use tracing::debug;

use crate::core::{EyeSide, GazeOverride, GazeSource};
use crate::error::SimResult;
use crate::interaction::{PrismState, ToolKind};
use crate::render::Renderer;

use super::{PluginEvent, SimulatorEngine};

impl<R: Renderer> SimulatorEngine<R> {
    /// Engages one tool (or none). The others are forced inactive.
    ///
    /// Leaving the occluder clears the occluder association. Leaving a
    /// gaze-steering tool drops its override so the eyes fall back to the
    /// deviation model. Engaging the prism with a non-zero strength
    /// reinstates its override.
    pub fn set_active_tool(&mut self, tool: Option<ToolKind>) {
        let previous = self.core.session.tools.active_tool();
        if previous == tool {
            return;
        }

        let before = self.core.eye_displacements();
        let session = &mut self.core.session;
        session.drag = None;
        session.feedback = None;
        session.tools.set_active(tool);
        let occluder_cleared =
            previous == Some(ToolKind::Occluder) && session.occluder_position.take().is_some();

        let source = tool.and_then(ToolKind::gaze_source);
        if session
            .gaze_override
            .is_some_and(|gaze| Some(gaze.source) != source)
        {
            session.gaze_override = None;
        }
        if source == Some(GazeSource::Prism) && session.tools.prism_state.value > 0 {
            let displacement = session.tools.prism_state.displacement(self.core.config.prism);
            session.gaze_override = Some(GazeOverride::conjugate(GazeSource::Prism, displacement));
        }

        debug!(
            previous = previous.map(ToolKind::as_str),
            active = tool.map(ToolKind::as_str),
            "active tool changed"
        );
        self.emit_plugin_event(PluginEvent::ActiveToolChanged { tool });
        if occluder_cleared {
            self.emit_plugin_event(PluginEvent::OccluderChanged { position: None });
        }
        if self.core.eye_displacements() != before {
            self.emit_gaze_changed();
        }
    }

    /// Engages `kind`, or disengages it when it is already the active tool.
    pub fn toggle_tool(&mut self, kind: ToolKind) {
        if self.core.session.tools.active_tool() == Some(kind) {
            self.set_active_tool(None);
        } else {
            self.set_active_tool(Some(kind));
        }
    }

    /// External occluder placement.
    ///
    /// `Some(side)` engages the occluder and snaps it onto that eye;
    /// `None` only drops the association and leaves the tool where it is.
    pub fn set_occluder_position(&mut self, position: Option<EyeSide>) {
        if let Some(side) = position {
            self.set_active_tool(Some(ToolKind::Occluder));
            let center = self.core.config.design.eye_center(side);
            self.core.session.tools.occluder.position = center;
        }
        self.update_occluder_position(position);
    }

    /// External prism sync. The axis is snapped to the configured step.
    pub fn set_prism(&mut self, value: u8, axis_degrees: f64) -> SimResult<()> {
        let tuning = self.core.config.prism;
        let state = PrismState::new(value, axis_degrees, tuning)?;
        self.apply_prism_state(state);
        Ok(())
    }

    /// Stores a new prism state and, while the prism is engaged, steers
    /// gaze with it.
    pub(super) fn apply_prism_state(&mut self, state: PrismState) {
        let before = self.core.eye_displacements();
        let session = &mut self.core.session;
        let changed = session.tools.prism_state != state;
        session.tools.prism_state = state;
        if session.tools.prism.active {
            let displacement = state.displacement(self.core.config.prism);
            session.gaze_override = Some(GazeOverride::conjugate(GazeSource::Prism, displacement));
        }

        if changed {
            self.emit_plugin_event(PluginEvent::PrismChanged {
                value: state.value,
                axis: state.axis,
            });
        }
        if self.core.eye_displacements() != before {
            self.emit_gaze_changed();
        }
    }

    /// Updates the occluded eye. Returns `true` when it changed.
    pub(super) fn update_occluder_position(&mut self, position: Option<EyeSide>) -> bool {
        if self.core.session.occluder_position == position {
            return false;
        }
        let before = self.core.eye_displacements();
        self.core.session.occluder_position = position;
        debug!(position = position.map(EyeSide::as_str), "occluder association changed");
        self.emit_plugin_event(PluginEvent::OccluderChanged { position });
        if self.core.eye_displacements() != before {
            self.emit_gaze_changed();
        }
        true
    }
}
