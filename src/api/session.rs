use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{
    DeviationKind, DeviationParameters, EyeSide, EyesAppearance, GazeOverride, MovementMode,
};
use crate::error::{SimError, SimResult};
use crate::interaction::{DragFeedback, DragSession, ToolSet};
use crate::render::Color;

/// Read-mostly snapshot of the shared configuration store.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    pub deviation: DeviationParameters,
    pub appearance: EyesAppearance,
}

impl SimulationParameters {
    pub fn validate(&self) -> SimResult<()> {
        self.deviation.validate()?;
        self.appearance.validate()
    }

    /// Flat key-addressed setter used by the configuration store.
    ///
    /// Deviation keys are the clinical names (`esotropia` .. `hypophoria`).
    /// Per-eye keys take a `.left` / `.right` suffix: `pupilSize`, `eyeSize`,
    /// `irisColor`. `movementMode` takes `iris_and_pupil`, `iris_only` or
    /// `pupil_only`.
    pub fn set_parameter(&mut self, key: &str, value: &Value) -> SimResult<()> {
        if let Ok(kind) = key.parse::<DeviationKind>() {
            return self.deviation.set(kind, number(key, value)?);
        }
        if key == "movementMode" {
            self.appearance.movement_mode = MovementMode::deserialize(value).map_err(|err| {
                SimError::InvalidData(format!("invalid movement mode: {err}"))
            })?;
            return Ok(());
        }

        let (field, side) = split_eye_key(key)?;
        let mut eye = *self.appearance.eyes.get(side);
        match field {
            "pupilSize" => eye.pupil_size = number(key, value)?,
            "eyeSize" => eye.eye_size = number(key, value)?,
            "irisColor" => {
                let text = value.as_str().ok_or_else(|| {
                    SimError::InvalidData(format!("`{key}` expects a hex color string"))
                })?;
                eye.iris_color = Color::from_hex(text)?;
            }
            _ => {
                return Err(SimError::InvalidData(format!(
                    "unknown parameter key `{key}`"
                )));
            }
        }
        eye.validate()?;
        *self.appearance.eyes.get_mut(side) = eye;
        Ok(())
    }
}

fn number(key: &str, value: &Value) -> SimResult<f64> {
    value
        .as_f64()
        .ok_or_else(|| SimError::InvalidData(format!("`{key}` expects a number")))
}

fn split_eye_key(key: &str) -> SimResult<(&str, EyeSide)> {
    let unknown = || SimError::InvalidData(format!("unknown parameter key `{key}`"));
    let (field, side) = key.rsplit_once('.').ok_or_else(unknown)?;
    let side = match side {
        "left" => EyeSide::Left,
        "right" => EyeSide::Right,
        _ => return Err(unknown()),
    };
    Ok((field, side))
}

/// Mutable simulation state owned by one engine for the session lifetime.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct SessionState {
    pub(super) parameters: SimulationParameters,
    pub(super) tools: ToolSet,
    pub(super) occluder_position: Option<EyeSide>,
    pub(super) gaze_override: Option<GazeOverride>,
    pub(super) drag: Option<DragSession>,
    pub(super) feedback: Option<DragFeedback>,
}

impl SessionState {
    pub(super) fn new(tools: ToolSet) -> Self {
        Self {
            parameters: SimulationParameters::default(),
            tools,
            occluder_position: None,
            gaze_override: None,
            drag: None,
            feedback: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn flat_keys_reach_deviation_and_eyes() {
        let mut params = SimulationParameters::default();
        params
            .set_parameter("esotropia", &json!(12.5))
            .expect("deviation key");
        params
            .set_parameter("pupilSize.right", &json!(6))
            .expect("pupil key");
        params
            .set_parameter("irisColor.left", &json!("#5a3825"))
            .expect("color key");
        params
            .set_parameter("movementMode", &json!("pupil_only"))
            .expect("mode key");

        assert_eq!(params.deviation.esotropia, 12.5);
        assert_eq!(params.appearance.eyes.right.pupil_size, 6.0);
        assert_eq!(params.appearance.eyes.left.iris_color.to_hex(), "#5a3825");
        assert_eq!(params.appearance.movement_mode, MovementMode::PupilOnly);
    }

    #[test]
    fn bad_keys_and_values_are_rejected() {
        let mut params = SimulationParameters::default();
        assert!(params.set_parameter("esotropia", &json!("ten")).is_err());
        assert!(params.set_parameter("exotropia", &json!(-3)).is_err());
        assert!(params.set_parameter("pupilSize.middle", &json!(3)).is_err());
        assert!(params.set_parameter("eyeSize.left", &json!(0)).is_err());
        assert!(params.set_parameter("blinkRate", &json!(1)).is_err());
        assert_eq!(params, SimulationParameters::default());
    }
}
