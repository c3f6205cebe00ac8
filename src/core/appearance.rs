//! Per-eye appearance and the manual (joystick-style) iris/pupil offsets.

use serde::{Deserialize, Serialize};

use crate::core::types::{Displacement, EyePair, EyeSide};
use crate::error::{SimError, SimResult};
use crate::render::Color;

pub const DEFAULT_PUPIL_SIZE: f64 = 4.0;
pub const DEFAULT_EYE_SIZE: f64 = 1.0;
pub const DEFAULT_IRIS_COLOR: Color = Color::rgb(60.0 / 255.0, 127.0 / 255.0, 177.0 / 255.0);
/// Per-axis limit of the manual iris offset.
pub const MAX_IRIS_OFFSET: f64 = 0.8;
/// Radial limit of the pupil offset from the iris centre.
pub const MAX_PUPIL_OFFSET: f64 = 0.4;

/// Which parts of the eye follow a manual movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementMode {
    #[default]
    IrisAndPupil,
    IrisOnly,
    PupilOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EyeAppearance {
    pub pupil_size: f64,
    pub iris_color: Color,
    pub eye_size: f64,
    /// Manual iris offset in normalised units, added to the deviation.
    pub manual_offset: Displacement,
    /// Pupil offset relative to the iris centre.
    pub pupil_offset: Displacement,
}

impl Default for EyeAppearance {
    fn default() -> Self {
        Self {
            pupil_size: DEFAULT_PUPIL_SIZE,
            iris_color: DEFAULT_IRIS_COLOR,
            eye_size: DEFAULT_EYE_SIZE,
            manual_offset: Displacement::ZERO,
            pupil_offset: Displacement::ZERO,
        }
    }
}

impl EyeAppearance {
    pub fn validate(&self) -> SimResult<()> {
        if !self.pupil_size.is_finite() || self.pupil_size <= 0.0 {
            return Err(SimError::InvalidData(
                "pupil size must be finite and > 0".to_owned(),
            ));
        }
        if !self.eye_size.is_finite() || self.eye_size <= 0.0 {
            return Err(SimError::InvalidData(
                "eye size must be finite and > 0".to_owned(),
            ));
        }
        for offset in [self.manual_offset, self.pupil_offset] {
            if !offset.x.is_finite() || !offset.y.is_finite() {
                return Err(SimError::InvalidData(
                    "eye offsets must be finite".to_owned(),
                ));
            }
        }
        self.iris_color.validate()
    }

    /// Moves the parts of this eye selected by `mode` by `delta`.
    pub fn apply_movement(&mut self, mode: MovementMode, delta: Displacement) {
        match mode {
            MovementMode::IrisAndPupil => {
                self.manual_offset = (self.manual_offset + delta).clamped(MAX_IRIS_OFFSET);
            }
            MovementMode::IrisOnly => {
                let pupil_absolute = self.manual_offset + self.pupil_offset;
                self.manual_offset = (self.manual_offset + delta).clamped(MAX_IRIS_OFFSET);
                self.pupil_offset = limit_radius(
                    Displacement::new(
                        pupil_absolute.x - self.manual_offset.x,
                        pupil_absolute.y - self.manual_offset.y,
                    ),
                    MAX_PUPIL_OFFSET,
                );
            }
            MovementMode::PupilOnly => {
                self.pupil_offset = limit_radius(self.pupil_offset + delta, MAX_PUPIL_OFFSET);
            }
        }
    }

    pub fn set_pupil_offset(&mut self, offset: Displacement) {
        self.pupil_offset = limit_radius(offset, MAX_PUPIL_OFFSET);
    }
}

fn limit_radius(offset: Displacement, radius: f64) -> Displacement {
    let length = offset.length();
    if length <= radius {
        return offset;
    }
    let ratio = radius / length;
    Displacement::new(offset.x * ratio, offset.y * ratio)
}

/// Appearance of both eyes plus the shared movement mode.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EyesAppearance {
    pub eyes: EyePair<EyeAppearance>,
    pub movement_mode: MovementMode,
}

impl EyesAppearance {
    pub fn validate(&self) -> SimResult<()> {
        self.eyes.left.validate()?;
        self.eyes.right.validate()
    }

    pub fn move_eye_components(&mut self, side: EyeSide, delta: Displacement) -> SimResult<()> {
        if !delta.x.is_finite() || !delta.y.is_finite() {
            return Err(SimError::InvalidData(
                "movement delta must be finite".to_owned(),
            ));
        }
        let mode = self.movement_mode;
        self.eyes.get_mut(side).apply_movement(mode, delta);
        Ok(())
    }

    /// Copies every appearance field of `from` onto the fellow eye.
    pub fn mirror_from(&mut self, from: EyeSide) {
        let source = *self.eyes.get(from);
        *self.eyes.get_mut(from.fellow()) = source;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn iris_offset_is_clamped_per_axis() {
        let mut eye = EyeAppearance::default();
        eye.apply_movement(MovementMode::IrisAndPupil, Displacement::new(2.0, -0.3));
        assert_relative_eq!(eye.manual_offset.x, MAX_IRIS_OFFSET);
        assert_relative_eq!(eye.manual_offset.y, -0.3);
        assert_eq!(eye.pupil_offset, Displacement::ZERO);
    }

    #[test]
    fn iris_only_keeps_pupil_in_place() {
        let mut eye = EyeAppearance::default();
        eye.apply_movement(MovementMode::IrisOnly, Displacement::new(0.2, 0.0));
        assert_relative_eq!(eye.manual_offset.x, 0.2);
        assert_relative_eq!(eye.pupil_offset.x, -0.2);
        assert_relative_eq!(eye.manual_offset.x + eye.pupil_offset.x, 0.0);
    }

    #[test]
    fn pupil_stays_inside_iris() {
        let mut eye = EyeAppearance::default();
        eye.apply_movement(MovementMode::PupilOnly, Displacement::new(0.3, 0.4));
        assert_relative_eq!(eye.pupil_offset.length(), MAX_PUPIL_OFFSET, epsilon = 1e-12);
        assert_relative_eq!(eye.pupil_offset.x, 0.24, epsilon = 1e-12);
    }

    #[test]
    fn mirror_copies_onto_fellow_eye() {
        let mut eyes = EyesAppearance::default();
        eyes.eyes.right.pupil_size = 7.0;
        eyes.mirror_from(EyeSide::Right);
        assert_eq!(eyes.eyes.left.pupil_size, 7.0);
        eyes.reset();
        assert_eq!(eyes, EyesAppearance::default());
    }
}
