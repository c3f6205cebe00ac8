use serde::{Deserialize, Serialize};

use crate::core::{Displacement, EyePair, EyeSide};
use crate::interaction::{PrismState, ToolKind};
use crate::render::Renderer;

use super::SimulatorEngine;

/// Gaze, occluder and prism state written back to the shared
/// configuration store so sibling views stay in sync.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub occluder_position: Option<EyeSide>,
    pub active_tool: Option<ToolKind>,
    pub displacement: EyePair<Displacement>,
    pub prism: PrismState,
}

impl<R: Renderer> SimulatorEngine<R> {
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            occluder_position: self.core.session.occluder_position,
            active_tool: self.core.session.tools.active_tool(),
            displacement: self.core.eye_displacements(),
            prism: self.core.session.tools.prism_state,
        }
    }
}
