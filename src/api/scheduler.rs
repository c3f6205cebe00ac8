use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::render::Renderer;

use super::SimulatorEngine;

/// Result of one compositor pass, as seen by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickOutcome {
    /// A frame was composed and handed to the renderer.
    Drawn,
    /// Nothing to draw yet (assets still loading, or a stale frame handle).
    Skipped,
    /// The view is unavailable or unmounted; stop scheduling.
    Halted,
}

impl TickOutcome {
    #[must_use]
    pub fn should_reschedule(self) -> bool {
        !matches!(self, TickOutcome::Halted)
    }
}

/// Opaque identifier of one requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameHandle(pub u64);

/// Host-side frame callback source (a display link, a GTK tick callback,
/// `requestAnimationFrame`, ...).
pub trait FrameClock {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Headless clock for tests and hosts that pump frames themselves.
///
/// Requests queue up in order; [`ManualFrameClock::next_due`] pops the
/// oldest one for the host to fire.
#[derive(Debug, Clone, Default)]
pub struct ManualFrameClock {
    next_id: u64,
    pending: Vec<FrameHandle>,
    cancelled: Vec<FrameHandle>,
}

impl ManualFrameClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_due(&mut self) -> Option<FrameHandle> {
        if self.pending.is_empty() {
            return None;
        }
        Some(self.pending.remove(0))
    }

    #[must_use]
    pub fn pending(&self) -> &[FrameHandle] {
        &self.pending
    }

    #[must_use]
    pub fn cancelled(&self) -> &[FrameHandle] {
        &self.cancelled
    }

    /// Total number of frames ever requested.
    #[must_use]
    pub fn requested_count(&self) -> u64 {
        self.next_id
    }
}

impl FrameClock for ManualFrameClock {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|pending| *pending != handle);
        self.cancelled.push(handle);
    }
}

/// Self-rescheduling tick loop owning at most one outstanding frame request.
#[derive(Debug)]
pub struct AnimationLoop<C: FrameClock> {
    clock: C,
    pending: Option<FrameHandle>,
}

impl<C: FrameClock> AnimationLoop<C> {
    #[must_use]
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            pending: None,
        }
    }

    /// Requests the first frame. No-op when already running.
    pub fn start(&mut self) {
        if self.pending.is_none() {
            let handle = self.clock.request_frame();
            debug!(handle = handle.0, "animation loop started");
            self.pending = Some(handle);
        }
    }

    /// Cancels the single outstanding request, if any.
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.clock.cancel_frame(handle);
            debug!(handle = handle.0, "animation loop stopped");
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn pending_handle(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Frame callback entry point.
    ///
    /// Handles other than the outstanding one are ignored. The next frame
    /// is requested from inside the callback unless the tick halted.
    pub fn on_frame<R: Renderer>(
        &mut self,
        handle: FrameHandle,
        engine: &mut SimulatorEngine<R>,
    ) -> TickOutcome {
        if self.pending != Some(handle) {
            trace!(handle = handle.0, "ignoring stale frame handle");
            return TickOutcome::Skipped;
        }
        self.pending = None;

        let outcome = engine.tick();
        if outcome.should_reschedule() {
            self.pending = Some(self.clock.request_frame());
        } else {
            debug!("animation loop halted");
        }
        outcome
    }

    /// Stops the loop and unmounts the engine in one step.
    pub fn unmount<R: Renderer>(&mut self, engine: &mut SimulatorEngine<R>) {
        self.stop();
        engine.unmount();
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    #[must_use]
    pub fn into_clock(self) -> C {
        self.clock
    }
}
