use futures::future::AbortHandle;

use crate::assets::AssetStore;
use crate::core::{
    Displacement, EyePair, RenderGeometry, Viewport, compute_eye_displacements,
};
use crate::render::LayeredFrame;

use super::plugin_registry::PluginRegistry;
use super::{SimulatorConfig, ViewStatus, session::SessionState};

/// Layout, asset and lifecycle state that is not part of the simulation
/// itself.
pub(super) struct EngineRuntime {
    pub(super) container: Viewport,
    pub(super) surface: Viewport,
    pub(super) assets: Option<AssetStore>,
    pub(super) geometry: Option<RenderGeometry>,
    pub(super) status: ViewStatus,
    pub(super) frame: LayeredFrame,
    pub(super) frames_drawn: u64,
    pub(super) pending_load: Option<AbortHandle>,
    pub(super) plugins: PluginRegistry,
}

/// Internal engine core state used by the public facade (`SimulatorEngine`).
pub(super) struct EngineCore {
    pub(super) config: SimulatorConfig,
    pub(super) session: SessionState,
    pub(super) runtime: EngineRuntime,
}

impl EngineCore {
    /// Per-eye displacement the compositor draws this tick: the gaze
    /// override when a target or prism owns gaze, else the deviation model.
    pub(super) fn eye_displacements(&self) -> EyePair<Displacement> {
        compute_eye_displacements(
            &self.session.parameters.deviation,
            self.session.occluder_position,
            self.session.gaze_override.as_ref(),
            self.config.deviation_scaling,
        )
    }

    pub(super) fn geometry_ready(&self) -> bool {
        self.runtime.geometry.is_some() && self.runtime.status.is_ready()
    }
}
