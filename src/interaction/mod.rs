//! Draggable diagnostic tools and the transient drag lifecycle.

mod drag;
mod tools;

pub use drag::{DragFeedback, DragSession, nearest_eye_within};
pub use tools::{
    HitBox, PrismState, PrismTuning, ToolAnchor, ToolKind, ToolSet, ToolState,
};

use serde::{Deserialize, Serialize};

/// Coarse pointer state exposed to hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InteractionMode {
    #[default]
    Idle,
    Dragging(ToolKind),
}
