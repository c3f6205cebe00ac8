//! Clinical deviation parameters and their mapping onto per-eye displacement.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::types::{Displacement, EyePair, EyeSide};
use crate::error::{SimError, SimResult};

/// Eight non-negative magnitudes in prism diopters.
///
/// Tropias are manifest and always applied. Phorias are latent and only
/// contribute to an eye while that eye is occluded. Opposing pairs may both be
/// non-zero; they combine additively with sign.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviationParameters {
    pub esotropia: f64,
    pub exotropia: f64,
    pub hypertropia: f64,
    pub hypotropia: f64,
    pub esophoria: f64,
    pub exophoria: f64,
    pub hyperphoria: f64,
    pub hypophoria: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviationKind {
    Esotropia,
    Exotropia,
    Hypertropia,
    Hypotropia,
    Esophoria,
    Exophoria,
    Hyperphoria,
    Hypophoria,
}

impl DeviationKind {
    pub const ALL: [DeviationKind; 8] = [
        DeviationKind::Esotropia,
        DeviationKind::Exotropia,
        DeviationKind::Hypertropia,
        DeviationKind::Hypotropia,
        DeviationKind::Esophoria,
        DeviationKind::Exophoria,
        DeviationKind::Hyperphoria,
        DeviationKind::Hypophoria,
    ];

    /// Key used by the external configuration store.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            DeviationKind::Esotropia => "esotropia",
            DeviationKind::Exotropia => "exotropia",
            DeviationKind::Hypertropia => "hypertropia",
            DeviationKind::Hypotropia => "hypotropia",
            DeviationKind::Esophoria => "esophoria",
            DeviationKind::Exophoria => "exophoria",
            DeviationKind::Hyperphoria => "hyperphoria",
            DeviationKind::Hypophoria => "hypophoria",
        }
    }

    /// Phorias only show while fusion is broken by occlusion.
    #[must_use]
    pub fn is_latent(self) -> bool {
        matches!(
            self,
            DeviationKind::Esophoria
                | DeviationKind::Exophoria
                | DeviationKind::Hyperphoria
                | DeviationKind::Hypophoria
        )
    }
}

impl fmt::Display for DeviationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DeviationKind {
    type Err = SimError;

    fn from_str(input: &str) -> SimResult<Self> {
        DeviationKind::ALL
            .into_iter()
            .find(|kind| kind.key() == input)
            .ok_or_else(|| SimError::InvalidData(format!("unknown deviation kind `{input}`")))
    }
}

impl DeviationParameters {
    #[must_use]
    pub fn get(&self, kind: DeviationKind) -> f64 {
        match kind {
            DeviationKind::Esotropia => self.esotropia,
            DeviationKind::Exotropia => self.exotropia,
            DeviationKind::Hypertropia => self.hypertropia,
            DeviationKind::Hypotropia => self.hypotropia,
            DeviationKind::Esophoria => self.esophoria,
            DeviationKind::Exophoria => self.exophoria,
            DeviationKind::Hyperphoria => self.hyperphoria,
            DeviationKind::Hypophoria => self.hypophoria,
        }
    }

    pub fn set(&mut self, kind: DeviationKind, diopters: f64) -> SimResult<()> {
        validate_magnitude(kind, diopters)?;
        let slot = match kind {
            DeviationKind::Esotropia => &mut self.esotropia,
            DeviationKind::Exotropia => &mut self.exotropia,
            DeviationKind::Hypertropia => &mut self.hypertropia,
            DeviationKind::Hypotropia => &mut self.hypotropia,
            DeviationKind::Esophoria => &mut self.esophoria,
            DeviationKind::Exophoria => &mut self.exophoria,
            DeviationKind::Hyperphoria => &mut self.hyperphoria,
            DeviationKind::Hypophoria => &mut self.hypophoria,
        };
        *slot = diopters;
        Ok(())
    }

    /// Builder form of [`DeviationParameters::set`]. Invalid magnitudes leave
    /// the field untouched.
    #[must_use]
    pub fn with(mut self, kind: DeviationKind, diopters: f64) -> Self {
        if self.set(kind, diopters).is_err() {
            tracing::warn!(%kind, diopters, "ignoring invalid deviation magnitude");
        }
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        for kind in DeviationKind::ALL {
            validate_magnitude(kind, self.get(kind))?;
        }
        Ok(())
    }

    /// Net manifest horizontal deviation in diopters (eso positive).
    #[must_use]
    pub fn net_horizontal_tropia(&self) -> f64 {
        self.esotropia - self.exotropia
    }

    /// Net manifest vertical deviation in diopters (hyper positive).
    #[must_use]
    pub fn net_vertical_tropia(&self) -> f64 {
        self.hypertropia - self.hypotropia
    }
}

fn validate_magnitude(kind: DeviationKind, diopters: f64) -> SimResult<()> {
    if !diopters.is_finite() || diopters < 0.0 {
        return Err(SimError::InvalidData(format!(
            "{kind} must be finite and >= 0, got {diopters}"
        )));
    }
    Ok(())
}

/// Diopter to normalised-displacement conversion shared by tropias and phorias.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviationScaling {
    pub diopter_factor: f64,
    pub normalization_divisor: f64,
}

impl Default for DeviationScaling {
    fn default() -> Self {
        Self {
            diopter_factor: 2.0,
            normalization_divisor: 10.0,
        }
    }
}

impl DeviationScaling {
    #[must_use]
    pub fn normalize(self, diopters: f64) -> f64 {
        diopters * self.diopter_factor / self.normalization_divisor
    }
}

/// Tool that published a gaze override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GazeSource {
    Target,
    Prism,
}

/// Tool-driven displacement that supersedes the resting deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazeOverride {
    pub source: GazeSource,
    pub displacement: EyePair<Displacement>,
}

impl GazeOverride {
    /// Both eyes follow the same displacement (conjugate gaze).
    #[must_use]
    pub fn conjugate(source: GazeSource, displacement: Displacement) -> Self {
        Self {
            source,
            displacement: EyePair::splat(displacement),
        }
    }
}

/// Displacement from tropias plus, for the occluded eye, phorias.
#[must_use]
pub fn deviation_displacement(
    side: EyeSide,
    params: &DeviationParameters,
    occluder_position: Option<EyeSide>,
    scaling: DeviationScaling,
) -> Displacement {
    let sign = side.sign();
    let mut horizontal = (params.esotropia - params.exotropia) * sign;
    let mut vertical = -params.hypertropia + params.hypotropia;

    if occluder_position == Some(side) {
        horizontal += (params.esophoria - params.exophoria) * sign;
        vertical += -params.hyperphoria + params.hypophoria;
    }

    Displacement::new(scaling.normalize(horizontal), scaling.normalize(vertical))
}

/// Resolves the displacement one eye is drawn with.
///
/// An override always wins over the deviation so a probing tool is never
/// fought by the resting misalignment. Values are not clamped here.
#[must_use]
pub fn compute_eye_displacement(
    side: EyeSide,
    params: &DeviationParameters,
    occluder_position: Option<EyeSide>,
    gaze_override: Option<&GazeOverride>,
) -> Displacement {
    compute_eye_displacement_scaled(
        side,
        params,
        occluder_position,
        gaze_override,
        DeviationScaling::default(),
    )
}

#[must_use]
pub fn compute_eye_displacement_scaled(
    side: EyeSide,
    params: &DeviationParameters,
    occluder_position: Option<EyeSide>,
    gaze_override: Option<&GazeOverride>,
    scaling: DeviationScaling,
) -> Displacement {
    match gaze_override {
        Some(gaze) => *gaze.displacement.get(side),
        None => deviation_displacement(side, params, occluder_position, scaling),
    }
}

#[must_use]
pub fn compute_eye_displacements(
    params: &DeviationParameters,
    occluder_position: Option<EyeSide>,
    gaze_override: Option<&GazeOverride>,
    scaling: DeviationScaling,
) -> EyePair<Displacement> {
    EyePair::new(
        compute_eye_displacement_scaled(
            EyeSide::Left,
            params,
            occluder_position,
            gaze_override,
            scaling,
        ),
        compute_eye_displacement_scaled(
            EyeSide::Right,
            params,
            occluder_position,
            gaze_override,
            scaling,
        ),
    )
}
