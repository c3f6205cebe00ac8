use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{DesignSize, Displacement, EyeSide, GazeSource, Point};
use crate::error::{SimError, SimResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Occluder,
    Target,
    Prism,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [ToolKind::Occluder, ToolKind::Target, ToolKind::Prism];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ToolKind::Occluder => "occluder",
            ToolKind::Target => "target",
            ToolKind::Prism => "prism",
        }
    }

    /// Tools that steer the gaze while engaged.
    #[must_use]
    pub fn gaze_source(self) -> Option<GazeSource> {
        match self {
            ToolKind::Occluder => None,
            ToolKind::Target => Some(GazeSource::Target),
            ToolKind::Prism => Some(GazeSource::Prism),
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolKind {
    type Err = SimError;

    fn from_str(input: &str) -> SimResult<Self> {
        ToolKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == input)
            .ok_or_else(|| SimError::InvalidData(format!("unknown tool `{input}`")))
    }
}

/// Point of the tool box its `position` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolAnchor {
    Center,
    /// Horizontally centred, vertically at the top edge (fixation stick).
    TopCenter,
}

/// Axis-aligned box in design space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl HitBox {
    #[must_use]
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.min_x && point.x <= self.max_x && point.y >= self.min_y && point.y <= self.max_y
    }
}

/// Position and lifecycle flags of one draggable tool. Positions are in
/// design space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolState {
    pub kind: ToolKind,
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub anchor: ToolAnchor,
    pub active: bool,
    pub dragging: bool,
}

impl ToolState {
    #[must_use]
    pub fn default_for(kind: ToolKind, design: DesignSize) -> Self {
        let (position, width, height, anchor) = match kind {
            ToolKind::Occluder => (
                design.eye_center(EyeSide::Left),
                200.0,
                200.0,
                ToolAnchor::Center,
            ),
            ToolKind::Target => (
                Point::new(design.width / 2.0, 80.0),
                130.0,
                570.0,
                ToolAnchor::TopCenter,
            ),
            ToolKind::Prism => (design.center(), 150.0, 150.0, ToolAnchor::Center),
        };
        Self {
            kind,
            position,
            width,
            height,
            anchor,
            active: false,
            dragging: false,
        }
    }

    /// Tool box grown by `margin` on every side.
    #[must_use]
    pub fn hit_box(&self, margin: f64) -> HitBox {
        let half_width = self.width / 2.0 + margin;
        let (min_y, max_y) = match self.anchor {
            ToolAnchor::Center => (
                self.position.y - self.height / 2.0 - margin,
                self.position.y + self.height / 2.0 + margin,
            ),
            ToolAnchor::TopCenter => (
                self.position.y - margin,
                self.position.y + self.height + margin,
            ),
        };
        HitBox {
            min_x: self.position.x - half_width,
            min_y,
            max_x: self.position.x + half_width,
            max_y,
        }
    }

    /// Top-left corner of the drawn sprite in design space.
    #[must_use]
    pub fn sprite_origin(&self) -> Point {
        match self.anchor {
            ToolAnchor::Center => Point::new(
                self.position.x - self.width / 2.0,
                self.position.y - self.height / 2.0,
            ),
            ToolAnchor::TopCenter => Point::new(self.position.x - self.width / 2.0, self.position.y),
        }
    }
}

/// Quantisation of prism strength and orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrismTuning {
    pub max_value: u8,
    pub axis_step_deg: u16,
    /// `value / divisor` is the normalised displacement magnitude.
    pub displacement_divisor: f64,
}

impl Default for PrismTuning {
    fn default() -> Self {
        Self {
            max_value: 20,
            axis_step_deg: 15,
            displacement_divisor: 40.0,
        }
    }
}

impl PrismTuning {
    pub fn validate(self) -> SimResult<()> {
        if self.axis_step_deg == 0 || 360 % self.axis_step_deg != 0 {
            return Err(SimError::InvalidData(
                "prism axis step must divide 360".to_owned(),
            ));
        }
        if !self.displacement_divisor.is_finite() || self.displacement_divisor <= 0.0 {
            return Err(SimError::InvalidData(
                "prism displacement divisor must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Snaps any finite angle onto the axis grid within `[0, 360)`.
    #[must_use]
    pub fn snap_axis(self, degrees: f64) -> u16 {
        let step = f64::from(self.axis_step_deg);
        let reduced = degrees.rem_euclid(360.0);
        let snapped = ((reduced / step).round() * step).rem_euclid(360.0);
        snapped as u16
    }
}

/// Prism strength in diopters and base orientation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PrismState {
    pub value: u8,
    pub axis: u16,
}

impl PrismState {
    pub fn new(value: u8, axis_degrees: f64, tuning: PrismTuning) -> SimResult<Self> {
        if value > tuning.max_value {
            return Err(SimError::InvalidData(format!(
                "prism value must be in 0..={}, got {value}",
                tuning.max_value
            )));
        }
        if !axis_degrees.is_finite() {
            return Err(SimError::InvalidData(
                "prism axis must be finite".to_owned(),
            ));
        }
        Ok(Self {
            value,
            axis: tuning.snap_axis(axis_degrees),
        })
    }

    /// Derives value and axis from a pointer offset relative to the surface
    /// centre. `reach` is the distance that maps onto the maximum value.
    #[must_use]
    pub fn from_pointer_offset(offset: Point, reach: f64, tuning: PrismTuning) -> Self {
        let distance = offset.x.hypot(offset.y);
        let normalized = if reach > 0.0 {
            (distance / reach).min(1.0)
        } else {
            0.0
        };
        let value = (normalized * f64::from(tuning.max_value)).round() as u8;
        let angle = offset.y.atan2(offset.x).to_degrees().rem_euclid(360.0);
        Self {
            value,
            axis: tuning.snap_axis(angle),
        }
    }

    #[must_use]
    pub fn displacement(self, tuning: PrismTuning) -> Displacement {
        let radians = f64::from(self.axis).to_radians();
        let magnitude = f64::from(self.value) / tuning.displacement_divisor;
        Displacement::new(radians.cos() * magnitude, radians.sin() * magnitude)
    }
}

/// The three tools plus the single-selection invariant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolSet {
    pub occluder: ToolState,
    pub target: ToolState,
    pub prism: ToolState,
    pub prism_state: PrismState,
    active_tool: Option<ToolKind>,
}

impl ToolSet {
    #[must_use]
    pub fn new(design: DesignSize) -> Self {
        Self {
            occluder: ToolState::default_for(ToolKind::Occluder, design),
            target: ToolState::default_for(ToolKind::Target, design),
            prism: ToolState::default_for(ToolKind::Prism, design),
            prism_state: PrismState::default(),
            active_tool: None,
        }
    }

    #[must_use]
    pub fn active_tool(&self) -> Option<ToolKind> {
        self.active_tool
    }

    #[must_use]
    pub fn get(&self, kind: ToolKind) -> &ToolState {
        match kind {
            ToolKind::Occluder => &self.occluder,
            ToolKind::Target => &self.target,
            ToolKind::Prism => &self.prism,
        }
    }

    pub fn get_mut(&mut self, kind: ToolKind) -> &mut ToolState {
        match kind {
            ToolKind::Occluder => &mut self.occluder,
            ToolKind::Target => &mut self.target,
            ToolKind::Prism => &mut self.prism,
        }
    }

    /// Selects at most one engaged tool. Every other tool is forced inactive
    /// and any drag is dropped. Returns the previously active tool.
    pub fn set_active(&mut self, tool: Option<ToolKind>) -> Option<ToolKind> {
        let previous = self.active_tool;
        for kind in ToolKind::ALL {
            let state = self.get_mut(kind);
            state.active = Some(kind) == tool;
            state.dragging = false;
        }
        self.active_tool = tool;
        previous
    }

    #[must_use]
    pub fn dragging_tool(&self) -> Option<ToolKind> {
        ToolKind::ALL
            .into_iter()
            .find(|kind| self.get(*kind).dragging)
    }
}
