use crate::assets::AssetStore;
use crate::core::{Displacement, EyePair, EyeSide, RenderGeometry, Viewport};
use crate::interaction::{DragFeedback, InteractionMode, PrismState, ToolKind, ToolState};
use crate::render::{LayeredFrame, Renderer};

use super::{SimulationParameters, SimulatorConfig, SimulatorEngine, ViewStatus};

impl<R: Renderer> SimulatorEngine<R> {
    #[must_use]
    pub fn config(&self) -> &SimulatorConfig {
        &self.core.config
    }

    #[must_use]
    pub fn parameters(&self) -> &SimulationParameters {
        &self.core.session.parameters
    }

    #[must_use]
    pub fn status(&self) -> &ViewStatus {
        &self.core.runtime.status
    }

    /// Container size last reported by the host.
    #[must_use]
    pub fn container(&self) -> Viewport {
        self.core.runtime.container
    }

    /// Pixel size of each of the four drawing surfaces.
    #[must_use]
    pub fn surface(&self) -> Viewport {
        self.core.runtime.surface
    }

    /// `None` until the face image has loaded.
    #[must_use]
    pub fn geometry(&self) -> Option<&RenderGeometry> {
        self.core.runtime.geometry.as_ref()
    }

    #[must_use]
    pub fn assets(&self) -> Option<&AssetStore> {
        self.core.runtime.assets.as_ref()
    }

    #[must_use]
    pub fn occluder_position(&self) -> Option<EyeSide> {
        self.core.session.occluder_position
    }

    #[must_use]
    pub fn active_tool(&self) -> Option<ToolKind> {
        self.core.session.tools.active_tool()
    }

    #[must_use]
    pub fn tool(&self, kind: ToolKind) -> &ToolState {
        self.core.session.tools.get(kind)
    }

    #[must_use]
    pub fn prism(&self) -> PrismState {
        self.core.session.tools.prism_state
    }

    #[must_use]
    pub fn has_gaze_override(&self) -> bool {
        self.core.session.gaze_override.is_some()
    }

    #[must_use]
    pub fn eye_displacement(&self, side: EyeSide) -> Displacement {
        *self.core.eye_displacements().get(side)
    }

    #[must_use]
    pub fn eye_displacements(&self) -> EyePair<Displacement> {
        self.core.eye_displacements()
    }

    #[must_use]
    pub fn drag_feedback(&self) -> Option<DragFeedback> {
        self.core.session.feedback
    }

    #[must_use]
    pub fn interaction_mode(&self) -> InteractionMode {
        self.core
            .session
            .drag
            .map_or(InteractionMode::Idle, |drag| InteractionMode::Dragging(drag.tool))
    }

    /// Last composed frame, empty before the first tick.
    #[must_use]
    pub fn last_frame(&self) -> &LayeredFrame {
        &self.core.runtime.frame
    }

    #[must_use]
    pub fn frames_drawn(&self) -> u64 {
        self.core.runtime.frames_drawn
    }
}
