use crate::error::SimResult;
use crate::render::{LayeredFrame, Renderer, SurfaceKind};

/// No-op renderer used by tests and headless engine usage.
///
/// It still validates frame content so tests can catch invalid geometry before
/// a real backend is introduced.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: u64,
    pub last_command_counts: [usize; 4],
    pub last_frame: Option<LayeredFrame>,
}

impl NullRenderer {
    #[must_use]
    pub fn last_command_count(&self, kind: SurfaceKind) -> usize {
        self.last_command_counts[kind.index()]
    }
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &LayeredFrame) -> SimResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_command_counts = frame.layers.each_ref().map(|layer| layer.commands.len());
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}
