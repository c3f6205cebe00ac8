use crate::core::Viewport;
use crate::error::{SimError, SimResult};

use super::{DrawCommand, SurfaceKind};

/// Ordered commands for one surface. Clips and transforms are scoped by
/// matching push/pop pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceLayer {
    pub kind: SurfaceKind,
    pub commands: Vec<DrawCommand>,
}

impl SurfaceLayer {
    #[must_use]
    pub fn new(kind: SurfaceKind) -> Self {
        Self {
            kind,
            commands: Vec::new(),
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        let mut clip_depth = 0usize;
        let mut transform_depth = 0usize;
        for command in &self.commands {
            command.validate()?;
            match command {
                DrawCommand::PushClip(_) => clip_depth += 1,
                DrawCommand::PushTransform(_) => transform_depth += 1,
                DrawCommand::PopClip => {
                    clip_depth = clip_depth.checked_sub(1).ok_or_else(|| {
                        SimError::InvalidData(format!("{:?}: clip pop without push", self.kind))
                    })?;
                }
                DrawCommand::PopTransform => {
                    transform_depth = transform_depth.checked_sub(1).ok_or_else(|| {
                        SimError::InvalidData(format!(
                            "{:?}: transform pop without push",
                            self.kind
                        ))
                    })?;
                }
                _ => {}
            }
        }
        if clip_depth != 0 || transform_depth != 0 {
            return Err(SimError::InvalidData(format!(
                "{:?}: unbalanced clip/transform scopes",
                self.kind
            )));
        }
        Ok(())
    }

    /// Number of commands that put paint on the surface.
    #[must_use]
    pub fn drawing_command_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| {
                !matches!(
                    command,
                    DrawCommand::PushClip(_)
                        | DrawCommand::PopClip
                        | DrawCommand::PushTransform(_)
                        | DrawCommand::PopTransform
                )
            })
            .count()
    }
}

/// Backend-agnostic scene for one compositor tick: one layer per surface.
#[derive(Debug, Clone, PartialEq)]
pub struct LayeredFrame {
    pub viewport: Viewport,
    pub layers: [SurfaceLayer; 4],
}

impl LayeredFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            layers: SurfaceKind::ORDERED.map(SurfaceLayer::new),
        }
    }

    pub fn push(&mut self, kind: SurfaceKind, command: DrawCommand) {
        self.layers[kind.index()].commands.push(command);
    }

    #[must_use]
    pub fn layer(&self, kind: SurfaceKind) -> &SurfaceLayer {
        &self.layers[kind.index()]
    }

    /// Clears every surface, keeping allocations.
    pub fn clear(&mut self) {
        for layer in &mut self.layers {
            layer.commands.clear();
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        if !self.viewport.is_valid() {
            return Err(SimError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        for layer in &self.layers {
            layer.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn command_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.commands.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.command_count() == 0
    }

    /// Commands of one surface, for assertions and debugging.
    pub fn commands(&self, kind: SurfaceKind) -> impl Iterator<Item = &DrawCommand> {
        self.layer(kind).commands.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::LayeredFrame;
    use crate::core::Viewport;
    use crate::render::{
        Color, DrawCommand, EllipseClip, LinePrimitive, SurfaceKind,
    };

    #[test]
    fn commands_land_on_their_surface_in_order() {
        let mut frame = LayeredFrame::new(Viewport::new(900, 600));
        frame.push(
            SurfaceKind::Overlay,
            DrawCommand::Line(LinePrimitive::new(0.0, 1.0, 5.0, 1.0, 1.0, Color::WHITE)),
        );
        frame.push(
            SurfaceKind::Overlay,
            DrawCommand::Line(LinePrimitive::new(0.0, 2.0, 5.0, 2.0, 1.0, Color::WHITE)),
        );
        assert_eq!(frame.command_count(), 2);
        assert!(frame.layer(SurfaceKind::Face).commands.is_empty());
        let ys: Vec<f64> = frame
            .commands(SurfaceKind::Overlay)
            .filter_map(|command| match command {
                DrawCommand::Line(line) => Some(line.y1),
                _ => None,
            })
            .collect();
        assert_eq!(ys, vec![1.0, 2.0]);
        frame.clear();
        assert!(frame.is_empty());
    }

    #[test]
    fn unbalanced_clip_fails_validation() {
        let mut frame = LayeredFrame::new(Viewport::new(900, 600));
        frame.push(
            SurfaceKind::Iris,
            DrawCommand::PushClip(EllipseClip {
                cx: 10.0,
                cy: 10.0,
                rx: 4.0,
                ry: 2.0,
            }),
        );
        assert!(frame.validate().is_err());
        frame.push(SurfaceKind::Iris, DrawCommand::PopClip);
        assert!(frame.validate().is_ok());
        frame.push(SurfaceKind::Iris, DrawCommand::PopClip);
        assert!(frame.validate().is_err());
    }
}
