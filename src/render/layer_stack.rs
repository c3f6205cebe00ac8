use serde::{Deserialize, Serialize};

/// The four stacked drawing surfaces, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceKind {
    /// Base face image.
    Face,
    /// Irises, pupils and light reflexes.
    Iris,
    /// Occluder, fixation target and prism.
    Tools,
    /// Deviation readout, gaze indicator and drag feedback.
    Overlay,
}

impl SurfaceKind {
    pub const ORDERED: [SurfaceKind; 4] = [
        SurfaceKind::Face,
        SurfaceKind::Iris,
        SurfaceKind::Tools,
        SurfaceKind::Overlay,
    ];

    /// Position of the surface in the stack.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            SurfaceKind::Face => 0,
            SurfaceKind::Iris => 1,
            SurfaceKind::Tools => 2,
            SurfaceKind::Overlay => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SurfaceKind;

    #[test]
    fn surface_indices_follow_stack_order() {
        for (position, kind) in SurfaceKind::ORDERED.into_iter().enumerate() {
            assert_eq!(kind.index(), position);
        }
    }
}
