mod layer_stack;
mod layered_frame;
mod null_renderer;
mod primitives;

pub use layer_stack::SurfaceKind;
pub use layered_frame::{LayeredFrame, SurfaceLayer};
pub use null_renderer::NullRenderer;
pub use primitives::{
    CirclePrimitive, Color, DrawCommand, EllipseClip, ImagePrimitive, LinePrimitive,
    PolygonPrimitive, RectPrimitive, Stroke, TextHAlign, TextPrimitive, Transform,
};

use crate::error::SimResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `LayeredFrame` so
/// drawing code remains isolated from the simulation model and pointer
/// handling.
pub trait Renderer {
    fn render(&mut self, frame: &LayeredFrame) -> SimResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoRenderStats, CairoRenderer};
