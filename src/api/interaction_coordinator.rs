use tracing::debug;

use crate::core::{
    Displacement, EyePair, EyeSide, GazeOverride, GazeSource, Point, RenderGeometry,
};
use crate::error::SimResult;
use crate::interaction::{DragFeedback, DragSession, PrismState, ToolKind, nearest_eye_within};
use crate::render::Renderer;

use super::validation::validate_pointer;
use super::{PluginEvent, SimulatorEngine};

impl<R: Renderer> SimulatorEngine<R> {
    /// Converts element-relative coordinates into surface pixels.
    pub fn pointer_from_element(
        &self,
        x: f64,
        y: f64,
        element_width: f64,
        element_height: f64,
    ) -> SimResult<Point> {
        crate::core::pointer_from_element(
            x,
            y,
            element_width,
            element_height,
            self.core.runtime.surface,
        )
    }

    /// Press at surface pixel `(x, y)`.
    ///
    /// Presses outside the drawing surface are ignored. Only the active
    /// tool is hit-tested, against its box grown by the hit margin.
    /// Returns `true` when a drag started. Before the assets have loaded
    /// this is a no-op.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> SimResult<bool> {
        let pointer = validate_pointer(x, y)?;
        let Some(geometry) = self.ready_geometry() else {
            return Ok(false);
        };
        if !geometry.contains_surface_point(pointer) {
            return Ok(false);
        }
        let Some(kind) = self.core.session.tools.active_tool() else {
            return Ok(false);
        };
        if self.core.session.drag.is_some() {
            return Ok(false);
        }

        let design = geometry.pointer_to_design(pointer);
        let margin = self.core.config.hit_margin;
        let session = &mut self.core.session;
        let tool = session.tools.get_mut(kind);
        if !tool.hit_box(margin).contains(design) {
            return Ok(false);
        }

        tool.dragging = true;
        session.drag = Some(DragSession::new(kind, design - tool.position, pointer));
        session.feedback = Some(DragFeedback::for_tool(kind, session.occluder_position));
        debug!(tool = kind.as_str(), x = design.x, y = design.y, "drag started");
        self.emit_plugin_event(PluginEvent::DragStarted { tool: kind });
        Ok(true)
    }

    /// Pointer motion at surface pixel `(x, y)`. Returns `true` when a
    /// dragged tool moved.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> SimResult<bool> {
        let pointer = validate_pointer(x, y)?;
        let Some(geometry) = self.ready_geometry() else {
            return Ok(false);
        };
        let Some(drag) = self.core.session.drag.as_mut() else {
            return Ok(false);
        };

        drag.track(pointer);
        let kind = drag.tool;
        let anchor = drag.anchor_for(geometry.pointer_to_design(pointer));
        self.core.session.tools.get_mut(kind).position = anchor;

        let center = geometry.surface_center();
        let surface = geometry.surface;
        match kind {
            ToolKind::Occluder => {
                let nearest = self.occluded_eye_at(&geometry, pointer);
                self.update_occluder_position(nearest);
                self.core.session.feedback = Some(DragFeedback::for_tool(
                    kind,
                    self.core.session.occluder_position,
                ));
            }
            ToolKind::Target => {
                let half_width = f64::from(surface.width) / 2.0;
                let half_height = f64::from(surface.height) / 2.0;
                let gain = self.core.config.target_gaze_gain;
                let direction = Displacement::new(
                    ((pointer.x - center.x) / half_width).clamp(-1.0, 1.0) * gain,
                    ((pointer.y - center.y) / half_height).clamp(-1.0, 1.0) * gain,
                );
                self.core.session.gaze_override =
                    Some(GazeOverride::conjugate(GazeSource::Target, direction));
                self.emit_gaze_changed();
            }
            ToolKind::Prism => {
                let reach = f64::from(surface.width.max(surface.height)) / 2.0;
                let state =
                    PrismState::from_pointer_offset(pointer - center, reach, self.core.config.prism);
                self.apply_prism_state(state);
            }
        }
        Ok(true)
    }

    /// Release. Returns the tool that was being dragged.
    ///
    /// Target and prism keep their gaze override while they stay engaged.
    /// An occluder that was moved re-checks eye proximity at the last
    /// pointer position; a plain click leaves its association alone.
    pub fn pointer_up(&mut self) -> Option<ToolKind> {
        let drag = self.core.session.drag.take()?;
        let kind = drag.tool;
        self.core.session.tools.get_mut(kind).dragging = false;
        self.core.session.feedback = None;

        if kind == ToolKind::Occluder && drag.moved {
            if let Some(geometry) = self.ready_geometry() {
                let nearest = self.occluded_eye_at(&geometry, drag.last_pointer);
                self.update_occluder_position(nearest);
            }
        }

        let keeps_override =
            kind.gaze_source().is_some() && self.core.session.tools.get(kind).active;
        if !keeps_override && self.core.session.gaze_override.take().is_some() {
            self.emit_gaze_changed();
        }

        debug!(tool = kind.as_str(), "drag ended");
        self.emit_plugin_event(PluginEvent::DragEnded { tool: kind });
        Some(kind)
    }

    /// The pointer left the view; ends any drag exactly like a release.
    pub fn pointer_leave(&mut self) -> Option<ToolKind> {
        self.pointer_up()
    }

    /// Eye an occluder held at surface pixel `pointer` covers, if any.
    fn occluded_eye_at(&self, geometry: &RenderGeometry, pointer: Point) -> Option<EyeSide> {
        let threshold = geometry.proximity_threshold(self.core.config.occluder_proximity_radius);
        let eyes = EyePair::new(
            geometry.eye_center_render(EyeSide::Left),
            geometry.eye_center_render(EyeSide::Right),
        );
        nearest_eye_within(pointer, eyes, threshold)
    }

    fn ready_geometry(&self) -> Option<RenderGeometry> {
        if !self.core.runtime.status.is_ready() {
            return None;
        }
        self.core.runtime.geometry
    }
}
