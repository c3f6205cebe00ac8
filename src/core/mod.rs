pub mod appearance;
pub mod deviation;
pub mod geometry;
pub mod types;

pub use appearance::{EyeAppearance, EyesAppearance, MovementMode};
pub use deviation::{
    DeviationKind, DeviationParameters, DeviationScaling, GazeOverride, GazeSource,
    compute_eye_displacement, compute_eye_displacements, deviation_displacement,
};
pub use geometry::{DesignSize, RenderGeometry, pointer_from_element, surface_size};
pub use types::{Displacement, EyePair, EyeSide, Point, Viewport};
