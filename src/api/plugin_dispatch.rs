use crate::extensions::PluginContext;
use crate::render::Renderer;

use super::{PluginEvent, SimulatorEngine};

impl<R: Renderer> SimulatorEngine<R> {
    pub(super) fn plugin_context(&self) -> PluginContext {
        let session = &self.core.session;
        PluginContext {
            surface: self.core.runtime.surface,
            geometry_ready: self.core.geometry_ready(),
            active_tool: session.tools.active_tool(),
            occluder_position: session.occluder_position,
            displacement: self.core.eye_displacements(),
            prism: session.tools.prism_state,
            interaction_mode: self.interaction_mode(),
        }
    }

    pub(super) fn emit_plugin_event(&mut self, event: PluginEvent) {
        if !self.core.runtime.plugins.wants(&event) {
            return;
        }
        let context = self.plugin_context();
        self.core.runtime.plugins.dispatch(event, context);
    }

    /// Publishes the current per-eye displacement to the shared store.
    pub(super) fn emit_gaze_changed(&mut self) {
        let displacement = self.core.eye_displacements();
        self.emit_plugin_event(PluginEvent::GazeChanged { displacement });
    }
}
