use tracing::{error, trace};

use crate::error::{SimError, SimResult};
use crate::render::Renderer;

use super::compositor::{CompositorInput, compose};
use super::{PluginEvent, SimulatorEngine, TickOutcome, UnavailableReason, ViewStatus};

#[cfg(feature = "cairo-backend")]
use crate::render::CairoContextRenderer;

pub(super) struct RenderCoordinator;

impl RenderCoordinator {
    /// Rebuilds `runtime.frame` from the current session state.
    pub(super) fn compose<R: Renderer>(engine: &mut SimulatorEngine<R>) -> SimResult<()> {
        let core = &mut engine.core;
        let displacement = core.eye_displacements();
        let runtime = &mut core.runtime;
        let geometry = runtime
            .geometry
            .as_ref()
            .ok_or_else(|| SimError::InvalidData("layout is not ready".to_owned()))?;
        let assets = runtime
            .assets
            .as_ref()
            .ok_or_else(|| SimError::InvalidData("assets are not loaded".to_owned()))?;

        let input = CompositorInput {
            geometry,
            assets,
            appearance: &core.session.parameters.appearance,
            deviation: &core.session.parameters.deviation,
            displacement,
            occluder_position: core.session.occluder_position,
            tools: &core.session.tools,
            feedback: core.session.feedback,
            weights: core.config.compositor,
        };
        compose(&mut runtime.frame, &input);
        Ok(())
    }

    pub(super) fn tick<R: Renderer>(engine: &mut SimulatorEngine<R>) -> TickOutcome {
        match engine.core.runtime.status {
            ViewStatus::Ready => {}
            ViewStatus::Loading(_) => return TickOutcome::Skipped,
            ViewStatus::Unavailable(_) | ViewStatus::Unmounted => return TickOutcome::Halted,
        }

        let drawn = Self::compose(engine)
            .and_then(|()| engine.renderer.render(&engine.core.runtime.frame));
        if let Err(err) = drawn {
            Self::fail_draw(engine, &err);
            return TickOutcome::Halted;
        }

        let runtime = &mut engine.core.runtime;
        runtime.frames_drawn += 1;
        trace!(
            frame = runtime.frames_drawn,
            commands = runtime.frame.command_count(),
            "frame drawn"
        );
        engine.emit_plugin_event(PluginEvent::Rendered);
        TickOutcome::Drawn
    }

    #[cfg(feature = "cairo-backend")]
    pub(super) fn render_on_cairo_context<R: Renderer + CairoContextRenderer>(
        engine: &mut SimulatorEngine<R>,
        context: &cairo::Context,
    ) -> SimResult<()> {
        if !engine.core.runtime.status.is_ready() {
            return Ok(());
        }
        let drawn = Self::compose(engine).and_then(|()| {
            engine
                .renderer
                .render_on_cairo_context(context, &engine.core.runtime.frame)
        });
        if let Err(err) = drawn {
            Self::fail_draw(engine, &err);
            return Err(err);
        }
        engine.core.runtime.frames_drawn += 1;
        engine.emit_plugin_event(PluginEvent::Rendered);
        Ok(())
    }

    fn fail_draw<R: Renderer>(engine: &mut SimulatorEngine<R>, err: &SimError) {
        error!(error = %err, "draw pass failed; view is now unavailable");
        engine.core.runtime.status = ViewStatus::Unavailable(UnavailableReason::DrawFault {
            message: err.to_string(),
        });
        engine.core.session.drag = None;
        engine.core.session.feedback = None;
        engine.emit_plugin_event(PluginEvent::ViewUnavailable);
    }
}
