use serde::{Deserialize, Serialize};

use crate::core::{Displacement, EyePair, EyeSide, Viewport};
use crate::interaction::{InteractionMode, PrismState, ToolKind};

/// Read-only state snapshot passed to plugin hooks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PluginContext {
    pub surface: Viewport,
    pub geometry_ready: bool,
    pub active_tool: Option<ToolKind>,
    pub occluder_position: Option<EyeSide>,
    pub displacement: EyePair<Displacement>,
    pub prism: PrismState,
    pub interaction_mode: InteractionMode,
}

/// Event stream exposed to plugins.
///
/// Gaze, occluder and prism events are the write-back channel towards a
/// shared configuration store so sibling views stay in sync.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PluginEvent {
    ActiveToolChanged { tool: Option<ToolKind> },
    OccluderChanged { position: Option<EyeSide> },
    GazeChanged { displacement: EyePair<Displacement> },
    PrismChanged { value: u8, axis: u16 },
    DragStarted { tool: ToolKind },
    DragEnded { tool: ToolKind },
    ViewUnavailable,
    Rendered,
}

impl PluginEvent {
    /// Changes mirrored into the shared configuration store.
    #[must_use]
    pub fn is_write_back(&self) -> bool {
        matches!(
            self,
            PluginEvent::GazeChanged { .. }
                | PluginEvent::OccluderChanged { .. }
                | PluginEvent::PrismChanged { .. }
        )
    }
}

/// Which events a plugin is handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PluginSubscription {
    #[default]
    All,
    /// Only gaze, occluder and prism changes.
    WriteBack,
}

impl PluginSubscription {
    #[must_use]
    pub fn accepts(self, event: &PluginEvent) -> bool {
        match self {
            PluginSubscription::All => true,
            PluginSubscription::WriteBack => event.is_write_back(),
        }
    }
}

/// Extension hook interface for bounded custom logic.
///
/// Plugins observe events and read engine context without mutating
/// simulator internals directly.
pub trait SimulatorPlugin {
    fn id(&self) -> &str;

    fn subscription(&self) -> PluginSubscription {
        PluginSubscription::All
    }

    fn on_event(&mut self, event: PluginEvent, context: PluginContext);
}
