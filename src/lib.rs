//! motility-rs: ocular-motility simulator core.
//!
//! The crate turns clinical deviation parameters (tropias and phorias in
//! prism diopters) into per-eye displacement, keeps the three diagnostic
//! tools (occluder, fixation target, prism) and their drag lifecycle, and
//! composites the view across four stacked drawing surfaces. Hosts drive it
//! through [`api::SimulatorEngine`] and a [`render::Renderer`] backend.

pub mod api;
pub mod assets;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{SimulatorConfig, SimulatorEngine};
pub use error::{SimError, SimResult};
