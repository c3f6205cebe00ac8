use tracing::debug;

use crate::assets::LoadProgress;
use crate::core::surface_size;
use crate::error::SimResult;
use crate::interaction::ToolSet;
use crate::render::{LayeredFrame, Renderer};

use super::{
    SimulatorConfig, SimulatorEngine, ViewStatus,
    engine_core::{EngineCore, EngineRuntime},
    plugin_registry::PluginRegistry,
    session::SessionState,
};

impl<R: Renderer> SimulatorEngine<R> {
    /// Creates an engine waiting for its assets.
    ///
    /// Pointer input is a no-op and ticks draw nothing until
    /// [`SimulatorEngine::apply_assets`] supplies the critical images.
    pub fn new(renderer: R, config: SimulatorConfig) -> SimResult<Self> {
        config.validate()?;
        let surface = surface_size(config.container, config.design, config.clamp_surface_to_design)?;
        debug!(
            container_width = config.container.width,
            container_height = config.container.height,
            surface_width = surface.width,
            surface_height = surface.height,
            "simulator engine created"
        );

        Ok(Self {
            renderer,
            core: EngineCore {
                config,
                session: SessionState::new(ToolSet::new(config.design)),
                runtime: EngineRuntime {
                    container: config.container,
                    surface,
                    assets: None,
                    geometry: None,
                    status: ViewStatus::Loading(LoadProgress {
                        loaded: 0,
                        total: 0,
                    }),
                    frame: LayeredFrame::new(surface),
                    frames_drawn: 0,
                    pending_load: None,
                    plugins: PluginRegistry::default(),
                },
            },
        })
    }
}
