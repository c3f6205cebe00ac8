use serde::{Deserialize, Serialize};

use crate::core::{DesignSize, DeviationScaling, Viewport};
use crate::error::{SimError, SimResult};
use crate::interaction::PrismTuning;

/// Weights the compositor applies when turning normalised offsets into
/// pixels. All weights are in design units and scaled by the render scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositorWeights {
    /// Manual (joystick) iris offset weight.
    pub manual_offset: f64,
    /// Deviation / gaze-override displacement weight.
    pub displacement: f64,
    /// Pupil offset weight relative to the iris.
    pub pupil_offset: f64,
    /// Displacement is clamped to `[-limit, limit]` per axis before drawing.
    pub displacement_limit: f64,
}

impl Default for CompositorWeights {
    fn default() -> Self {
        Self {
            manual_offset: 40.0,
            displacement: 25.0,
            pupil_offset: 15.0,
            displacement_limit: 2.0,
        }
    }
}

/// Public engine bootstrap configuration.
///
/// This type is serializable so host applications can persist/load simulator
/// setup without inventing their own ad-hoc format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Size of the hosting container in pixels.
    pub container: Viewport,
    #[serde(default)]
    pub design: DesignSize,
    #[serde(default = "default_clamp_surface_to_design")]
    pub clamp_surface_to_design: bool,
    #[serde(default = "default_hit_margin")]
    pub hit_margin: f64,
    #[serde(default = "default_occluder_proximity_radius")]
    pub occluder_proximity_radius: f64,
    #[serde(default = "default_target_gaze_gain")]
    pub target_gaze_gain: f64,
    #[serde(default)]
    pub prism: PrismTuning,
    #[serde(default)]
    pub deviation_scaling: DeviationScaling,
    #[serde(default)]
    pub compositor: CompositorWeights,
}

impl SimulatorConfig {
    #[must_use]
    pub fn new(container: Viewport) -> Self {
        Self {
            container,
            design: DesignSize::default(),
            clamp_surface_to_design: default_clamp_surface_to_design(),
            hit_margin: default_hit_margin(),
            occluder_proximity_radius: default_occluder_proximity_radius(),
            target_gaze_gain: default_target_gaze_gain(),
            prism: PrismTuning::default(),
            deviation_scaling: DeviationScaling::default(),
            compositor: CompositorWeights::default(),
        }
    }

    /// Sets the fixed logical canvas size.
    #[must_use]
    pub fn with_design_size(mut self, design: DesignSize) -> Self {
        self.design = design;
        self
    }

    /// Allows surfaces smaller than the design size.
    #[must_use]
    pub fn with_clamp_surface_to_design(mut self, clamp: bool) -> Self {
        self.clamp_surface_to_design = clamp;
        self
    }

    #[must_use]
    pub fn with_hit_margin(mut self, margin: f64) -> Self {
        self.hit_margin = margin;
        self
    }

    #[must_use]
    pub fn with_occluder_proximity_radius(mut self, radius: f64) -> Self {
        self.occluder_proximity_radius = radius;
        self
    }

    #[must_use]
    pub fn with_target_gaze_gain(mut self, gain: f64) -> Self {
        self.target_gaze_gain = gain;
        self
    }

    #[must_use]
    pub fn with_prism_tuning(mut self, tuning: PrismTuning) -> Self {
        self.prism = tuning;
        self
    }

    #[must_use]
    pub fn with_deviation_scaling(mut self, scaling: DeviationScaling) -> Self {
        self.deviation_scaling = scaling;
        self
    }

    #[must_use]
    pub fn with_compositor_weights(mut self, weights: CompositorWeights) -> Self {
        self.compositor = weights;
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        if !self.container.is_valid() {
            return Err(SimError::InvalidViewport {
                width: self.container.width,
                height: self.container.height,
            });
        }
        if !self.design.is_valid() {
            return Err(SimError::InvalidData(
                "design size must be finite and > 0".to_owned(),
            ));
        }
        for (name, value) in [
            ("hit margin", self.hit_margin),
            ("occluder proximity radius", self.occluder_proximity_radius),
            ("target gaze gain", self.target_gaze_gain),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::InvalidData(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        let scaling = self.deviation_scaling;
        if !scaling.diopter_factor.is_finite()
            || !scaling.normalization_divisor.is_finite()
            || scaling.normalization_divisor <= 0.0
        {
            return Err(SimError::InvalidData(
                "deviation scaling must be finite with a divisor > 0".to_owned(),
            ));
        }
        let weights = self.compositor;
        if [
            weights.manual_offset,
            weights.displacement,
            weights.pupil_offset,
            weights.displacement_limit,
        ]
        .iter()
        .any(|value| !value.is_finite() || *value < 0.0)
        {
            return Err(SimError::InvalidData(
                "compositor weights must be finite and >= 0".to_owned(),
            ));
        }
        self.prism.validate()
    }
}

fn default_clamp_surface_to_design() -> bool {
    true
}

fn default_hit_margin() -> f64 {
    20.0
}

fn default_occluder_proximity_radius() -> f64 {
    120.0
}

fn default_target_gaze_gain() -> f64 {
    0.5
}
