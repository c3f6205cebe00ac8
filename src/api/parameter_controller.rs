use serde_json::Value;
use tracing::debug;

use crate::core::{
    DeviationKind, DeviationParameters, Displacement, EyeAppearance, EyeSide, MovementMode,
};
use crate::error::SimResult;
use crate::render::{Color, Renderer};

use super::validation::validate_movement_delta;
use super::{SimulationParameters, SimulatorEngine};

impl<R: Renderer> SimulatorEngine<R> {
    /// Sets one deviation magnitude in prism diopters.
    pub fn set_deviation(&mut self, kind: DeviationKind, diopters: f64) -> SimResult<()> {
        self.update_parameters(|parameters| parameters.deviation.set(kind, diopters))
    }

    pub fn set_deviation_parameters(&mut self, deviation: DeviationParameters) -> SimResult<()> {
        deviation.validate()?;
        self.update_parameters(|parameters| {
            parameters.deviation = deviation;
            Ok(())
        })
    }

    /// Replaces the whole parameter snapshot, typically after a change
    /// notification from the shared configuration store.
    pub fn apply_parameters(&mut self, parameters: SimulationParameters) -> SimResult<()> {
        parameters.validate()?;
        self.update_parameters(|current| {
            *current = parameters;
            Ok(())
        })
    }

    /// Flat key-addressed setter; see [`SimulationParameters::set_parameter`].
    pub fn set_parameter(&mut self, key: &str, value: &Value) -> SimResult<()> {
        self.update_parameters(|parameters| parameters.set_parameter(key, value))
    }

    pub fn set_movement_mode(&mut self, mode: MovementMode) {
        self.core.session.parameters.appearance.movement_mode = mode;
    }

    /// Joystick-style manual movement of one eye, honoring the movement mode.
    pub fn move_eye_components(&mut self, side: EyeSide, delta: Displacement) -> SimResult<()> {
        self.core
            .session
            .parameters
            .appearance
            .move_eye_components(side, delta)
    }

    pub fn set_pupil_offset(&mut self, side: EyeSide, offset: Displacement) -> SimResult<()> {
        validate_movement_delta(offset.x, offset.y)?;
        self.core
            .session
            .parameters
            .appearance
            .eyes
            .get_mut(side)
            .set_pupil_offset(offset);
        Ok(())
    }

    pub fn set_pupil_size(&mut self, side: EyeSide, size: f64) -> SimResult<()> {
        self.update_eye(side, |eye| eye.pupil_size = size)
    }

    pub fn set_eye_size(&mut self, side: EyeSide, size: f64) -> SimResult<()> {
        self.update_eye(side, |eye| eye.eye_size = size)
    }

    pub fn set_iris_color(&mut self, side: EyeSide, color: Color) -> SimResult<()> {
        self.update_eye(side, |eye| eye.iris_color = color)
    }

    /// Copies one eye's appearance onto the other.
    pub fn mirror_eye_settings(&mut self, from: EyeSide) {
        self.core.session.parameters.appearance.mirror_from(from);
        debug!(from = from.as_str(), "eye settings mirrored");
    }

    /// Restores default appearance and recentres both eyes.
    pub fn reset_eyes(&mut self) {
        self.core.session.parameters.appearance.reset();
        debug!("eye appearance reset");
    }

    fn update_eye(
        &mut self,
        side: EyeSide,
        apply: impl FnOnce(&mut EyeAppearance),
    ) -> SimResult<()> {
        let eyes = &mut self.core.session.parameters.appearance.eyes;
        let mut eye = *eyes.get(side);
        apply(&mut eye);
        eye.validate()?;
        *eyes.get_mut(side) = eye;
        Ok(())
    }

    /// Runs `apply` on a copy of the parameters and commits it on success.
    /// Emits `GazeChanged` when the displayed displacement moved.
    fn update_parameters(
        &mut self,
        apply: impl FnOnce(&mut SimulationParameters) -> SimResult<()>,
    ) -> SimResult<()> {
        let before = self.core.eye_displacements();
        let mut parameters = self.core.session.parameters;
        apply(&mut parameters)?;
        self.core.session.parameters = parameters;
        if self.core.eye_displacements() != before {
            self.emit_gaze_changed();
        }
        Ok(())
    }
}
