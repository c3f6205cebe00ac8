use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Pixel size of one drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    #[must_use]
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    #[must_use]
    pub fn aspect_ratio(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// A position in design, render or pointer space. The space is implied by
/// the API that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Normalised eye displacement (roughly -1..1 per axis before compositor
/// scaling; tropias of large magnitude exceed that range).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Displacement {
    pub x: f64,
    pub y: f64,
}

impl Displacement {
    pub const ZERO: Displacement = Displacement { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Clamps both axes into `[-limit, limit]`.
    #[must_use]
    pub fn clamped(self, limit: f64) -> Self {
        Self::new(self.x.clamp(-limit, limit), self.y.clamp(-limit, limit))
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl Add for Displacement {
    type Output = Displacement;

    fn add(self, rhs: Displacement) -> Displacement {
        Displacement::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Which of the two symmetric eyes a value belongs to.
///
/// `Left` is the eye drawn on the left of the face image (labelled `OD` in the
/// readout), `Right` the one drawn on the right (`OS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EyeSide {
    Left,
    Right,
}

impl EyeSide {
    pub const BOTH: [EyeSide; 2] = [EyeSide::Left, EyeSide::Right];

    /// Horizontal sign convention: +1 for the left eye, -1 for its mirror.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            EyeSide::Left => 1.0,
            EyeSide::Right => -1.0,
        }
    }

    #[must_use]
    pub fn fellow(self) -> EyeSide {
        match self {
            EyeSide::Left => EyeSide::Right,
            EyeSide::Right => EyeSide::Left,
        }
    }

    #[must_use]
    pub fn readout_label(self) -> &'static str {
        match self {
            EyeSide::Left => "OD",
            EyeSide::Right => "OS",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EyeSide::Left => "left",
            EyeSide::Right => "right",
        }
    }
}

/// One value per eye.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EyePair<T> {
    pub left: T,
    pub right: T,
}

impl<T> EyePair<T> {
    #[must_use]
    pub const fn new(left: T, right: T) -> Self {
        Self { left, right }
    }

    #[must_use]
    pub fn get(&self, side: EyeSide) -> &T {
        match side {
            EyeSide::Left => &self.left,
            EyeSide::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, side: EyeSide) -> &mut T {
        match side {
            EyeSide::Left => &mut self.left,
            EyeSide::Right => &mut self.right,
        }
    }

    #[must_use]
    pub fn map<U>(self, mut f: impl FnMut(EyeSide, T) -> U) -> EyePair<U> {
        EyePair {
            left: f(EyeSide::Left, self.left),
            right: f(EyeSide::Right, self.right),
        }
    }
}

impl<T: Clone> EyePair<T> {
    #[must_use]
    pub fn splat(value: T) -> Self {
        Self {
            left: value.clone(),
            right: value,
        }
    }
}
