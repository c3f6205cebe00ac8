use crate::error::SimResult;
use crate::render::Renderer;

use super::{TickOutcome, engine_core::EngineCore, render_coordinator::RenderCoordinator};

#[cfg(feature = "cairo-backend")]
use crate::render::CairoContextRenderer;

/// Main orchestration facade consumed by host applications.
///
/// `SimulatorEngine` owns the simulation session (deviation parameters, eye
/// appearance, tools, occlusion and gaze override), the layout derived from
/// the container and face image, and the renderer. Every mutation goes
/// through one of its intent methods; the compositor reads the resulting
/// state on each tick.
pub struct SimulatorEngine<R: Renderer> {
    pub(super) renderer: R,
    pub(super) core: EngineCore,
}

impl<R: Renderer> SimulatorEngine<R> {
    /// Runs one compositor pass.
    ///
    /// A renderer failure is not returned: it flips the view into the
    /// unavailable state and the outcome asks the scheduler to halt.
    pub fn tick(&mut self) -> TickOutcome {
        RenderCoordinator::tick(self)
    }

    /// Renders the current frame into an external cairo context.
    ///
    /// This path is used by GTK draw callbacks while keeping the renderer
    /// implementation decoupled from GTK-specific APIs.
    #[cfg(feature = "cairo-backend")]
    pub fn render_on_cairo_context(&mut self, context: &cairo::Context) -> SimResult<()>
    where
        R: CairoContextRenderer,
    {
        RenderCoordinator::render_on_cairo_context(self, context)
    }

    /// Builds the frame for the current state without rendering it.
    pub fn compose_frame(&mut self) -> SimResult<&crate::render::LayeredFrame> {
        RenderCoordinator::compose(self)?;
        Ok(&self.core.runtime.frame)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
