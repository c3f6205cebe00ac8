use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{EyePair, EyeSide, Point};

use super::ToolKind;

/// Transient state of the drag currently in progress. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragSession {
    pub tool: ToolKind,
    /// Pointer minus tool anchor at press time, in design space.
    pub grab_offset: Point,
    /// Latest pointer position in surface pixels.
    pub last_pointer: Point,
    /// Set once the pointer has moved away from the press position.
    pub moved: bool,
}

impl DragSession {
    #[must_use]
    pub fn new(tool: ToolKind, grab_offset: Point, pointer: Point) -> Self {
        Self {
            tool,
            grab_offset,
            last_pointer: pointer,
            moved: false,
        }
    }

    /// Records a pointer position; only a new position marks the drag moved.
    pub fn track(&mut self, pointer: Point) {
        if pointer != self.last_pointer {
            self.last_pointer = pointer;
            self.moved = true;
        }
    }

    /// New tool anchor for a pointer at `pointer_design`.
    #[must_use]
    pub fn anchor_for(&self, pointer_design: Point) -> Point {
        pointer_design - self.grab_offset
    }
}

/// Short status line shown while a tool is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragFeedback {
    DraggingOccluder,
    Occluding(EyeSide),
    DraggingTarget,
    DraggingPrism,
}

impl DragFeedback {
    #[must_use]
    pub fn for_tool(tool: ToolKind, occluding: Option<EyeSide>) -> Self {
        match (tool, occluding) {
            (ToolKind::Occluder, Some(side)) => DragFeedback::Occluding(side),
            (ToolKind::Occluder, None) => DragFeedback::DraggingOccluder,
            (ToolKind::Target, _) => DragFeedback::DraggingTarget,
            (ToolKind::Prism, _) => DragFeedback::DraggingPrism,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DragFeedback::DraggingOccluder => "Dragging Occluder",
            DragFeedback::Occluding(EyeSide::Left) => "Occluding Left Eye",
            DragFeedback::Occluding(EyeSide::Right) => "Occluding Right Eye",
            DragFeedback::DraggingTarget => "Dragging Target",
            DragFeedback::DraggingPrism => "Dragging Prism",
        }
    }
}

/// Eye whose centre is nearest to `pointer` and strictly within `threshold`.
/// Equal distances resolve to the left eye.
#[must_use]
pub fn nearest_eye_within(
    pointer: Point,
    eye_centers: EyePair<Point>,
    threshold: f64,
) -> Option<EyeSide> {
    let candidates: SmallVec<[(OrderedFloat<f64>, EyeSide); 2]> = EyeSide::BOTH
        .into_iter()
        .map(|side| (OrderedFloat(pointer.distance_to(*eye_centers.get(side))), side))
        .collect();

    candidates
        .into_iter()
        .min_by_key(|item| item.0)
        .filter(|(distance, _)| distance.0 < threshold)
        .map(|(_, side)| side)
}
