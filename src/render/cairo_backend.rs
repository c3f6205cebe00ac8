use std::collections::HashMap;
use std::f64::consts::TAU;
use std::io::Read;

use cairo::{Context, Format, ImageSurface, Operator};
use pango::FontDescription;

use crate::error::{SimError, SimResult};
use crate::render::{
    Color, DrawCommand, LayeredFrame, Renderer, Stroke, SurfaceKind, TextHAlign,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub shapes_drawn: usize,
    pub texts_drawn: usize,
    pub images_drawn: usize,
    /// Image commands whose sprite had no registered pixels.
    pub images_missing: usize,
}

/// Optional extension trait for renderers that can draw into an external Cairo
/// context (for example a GTK `DrawingArea` callback). All four surfaces are
/// drawn bottom to top.
pub trait CairoContextRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &LayeredFrame,
    ) -> SimResult<()>;
}

/// Cairo + Pango + PangoCairo renderer backend.
///
/// Each surface of the stack is rasterised into its own transparent image
/// surface and cleared independently every frame. Sprite pixels are
/// registered by name; the frame only references them.
#[derive(Debug)]
pub struct CairoRenderer {
    surfaces: [ImageSurface; 4],
    sprites: HashMap<String, ImageSurface>,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> SimResult<Self> {
        Ok(Self {
            surfaces: create_surfaces(width, height)?,
            sprites: HashMap::new(),
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn surface(&self, kind: SurfaceKind) -> &ImageSurface {
        &self.surfaces[kind.index()]
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    pub fn register_sprite(&mut self, name: impl Into<String>, surface: ImageSurface) {
        self.sprites.insert(name.into(), surface);
    }

    pub fn register_png(&mut self, name: impl Into<String>, reader: &mut impl Read) -> SimResult<()> {
        let name = name.into();
        let surface = ImageSurface::create_from_png(reader).map_err(|err| SimError::AssetLoad {
            name: name.clone(),
            reason: err.to_string(),
        })?;
        self.sprites.insert(name, surface);
        Ok(())
    }

    #[must_use]
    pub fn has_sprite(&self, name: &str) -> bool {
        self.sprites.contains_key(name)
    }

    /// Flattens the four surfaces into a single image.
    pub fn composite(&self) -> SimResult<ImageSurface> {
        let base = self.surface(SurfaceKind::Face);
        let output = ImageSurface::create(Format::ARgb32, base.width(), base.height())
            .map_err(|err| map_backend_error("failed to create composite surface", err))?;
        let context = Context::new(&output)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        for surface in &self.surfaces {
            context
                .set_source_surface(surface, 0.0, 0.0)
                .map_err(|err| map_backend_error("failed to set layer source", err))?;
            context
                .paint()
                .map_err(|err| map_backend_error("failed to composite layer", err))?;
        }
        drop(context);
        Ok(output)
    }

    fn ensure_size(&mut self, frame: &LayeredFrame) -> SimResult<()> {
        let width = i32::try_from(frame.viewport.width)
            .map_err(|_| SimError::InvalidData("surface width exceeds i32".to_owned()))?;
        let height = i32::try_from(frame.viewport.height)
            .map_err(|_| SimError::InvalidData("surface height exceeds i32".to_owned()))?;
        let current = self.surface(SurfaceKind::Face);
        if current.width() != width || current.height() != height {
            self.surfaces = create_surfaces(width, height)?;
        }
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &LayeredFrame) -> SimResult<()> {
        frame.validate()?;
        self.ensure_size(frame)?;

        let mut stats = CairoRenderStats::default();
        for layer in &frame.layers {
            let context = Context::new(&self.surfaces[layer.kind.index()])
                .map_err(|err| map_backend_error("failed to create cairo context", err))?;
            context.set_operator(Operator::Clear);
            context
                .paint()
                .map_err(|err| map_backend_error("failed to clear surface", err))?;
            context.set_operator(Operator::Over);
            draw_commands(&context, &layer.commands, &self.sprites, &mut stats)?;
        }
        self.last_stats = stats;
        Ok(())
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &LayeredFrame,
    ) -> SimResult<()> {
        frame.validate()?;
        let mut stats = CairoRenderStats::default();
        for layer in &frame.layers {
            draw_commands(context, &layer.commands, &self.sprites, &mut stats)?;
        }
        self.last_stats = stats;
        Ok(())
    }
}

fn create_surfaces(width: i32, height: i32) -> SimResult<[ImageSurface; 4]> {
    if width <= 0 || height <= 0 {
        return Err(SimError::InvalidData(
            "cairo surface size must be > 0".to_owned(),
        ));
    }
    let create = || {
        ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))
    };
    Ok([create()?, create()?, create()?, create()?])
}

fn draw_commands(
    context: &Context,
    commands: &[DrawCommand],
    sprites: &HashMap<String, ImageSurface>,
    stats: &mut CairoRenderStats,
) -> SimResult<()> {
    for command in commands {
        match command {
            DrawCommand::PushClip(clip) => {
                save(context)?;
                context.new_path();
                save(context)?;
                context.translate(clip.cx, clip.cy);
                context.scale(clip.rx, clip.ry);
                context.arc(0.0, 0.0, 1.0, 0.0, TAU);
                restore(context)?;
                context.clip();
            }
            DrawCommand::PushTransform(transform) => {
                save(context)?;
                context.translate(transform.translate_x, transform.translate_y);
                context.rotate(transform.rotation_deg.to_radians());
            }
            DrawCommand::PopClip | DrawCommand::PopTransform => restore(context)?,
            DrawCommand::Line(line) => {
                context.new_path();
                apply_color(context, line.color);
                context.set_line_width(line.stroke_width);
                context.move_to(line.x1, line.y1);
                context.line_to(line.x2, line.y2);
                context
                    .stroke()
                    .map_err(|err| map_backend_error("failed to stroke line", err))?;
                stats.shapes_drawn += 1;
            }
            DrawCommand::Rect(rect) => {
                context.new_path();
                context.rectangle(rect.x, rect.y, rect.width, rect.height);
                apply_color(context, rect.fill_color);
                context
                    .fill()
                    .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
                stats.shapes_drawn += 1;
            }
            DrawCommand::Circle(circle) => {
                context.new_path();
                context.arc(circle.cx, circle.cy, circle.radius, 0.0, TAU);
                paint_path(context, circle.fill_color, circle.stroke)?;
                stats.shapes_drawn += 1;
            }
            DrawCommand::Polygon(polygon) => {
                context.new_path();
                let mut points = polygon.points.iter();
                if let Some(first) = points.next() {
                    context.move_to(first.x, first.y);
                }
                for point in points {
                    context.line_to(point.x, point.y);
                }
                context.close_path();
                paint_path(context, polygon.fill_color, polygon.stroke)?;
                stats.shapes_drawn += 1;
            }
            DrawCommand::Text(text) => {
                let layout = pangocairo::functions::create_layout(context);
                let font_description =
                    FontDescription::from_string(&format!("Sans {}px", text.font_size_px));
                layout.set_font_description(Some(&font_description));
                layout.set_text(&text.text);

                let (text_width, _text_height) = layout.pixel_size();
                let x = match text.h_align {
                    TextHAlign::Left => text.x,
                    TextHAlign::Center => text.x - f64::from(text_width) / 2.0,
                    TextHAlign::Right => text.x - f64::from(text_width),
                };
                let baseline = f64::from(layout.baseline()) / f64::from(pango::SCALE);

                apply_color(context, text.color);
                context.move_to(x, text.y - baseline);
                pangocairo::functions::show_layout(context, &layout);
                stats.texts_drawn += 1;
            }
            DrawCommand::Image(image) => {
                let Some(sprite) = sprites.get(&image.sprite) else {
                    stats.images_missing += 1;
                    continue;
                };
                if sprite.width() <= 0 || sprite.height() <= 0 {
                    stats.images_missing += 1;
                    continue;
                }
                save(context)?;
                context.translate(image.x, image.y);
                context.scale(
                    image.width / f64::from(sprite.width()),
                    image.height / f64::from(sprite.height()),
                );
                context
                    .set_source_surface(sprite, 0.0, 0.0)
                    .map_err(|err| map_backend_error("failed to set sprite source", err))?;
                context
                    .paint()
                    .map_err(|err| map_backend_error("failed to paint sprite", err))?;
                restore(context)?;
                stats.images_drawn += 1;
            }
        }
    }
    Ok(())
}

fn paint_path(context: &Context, fill_color: Option<Color>, stroke: Option<Stroke>) -> SimResult<()> {
    if let Some(color) = fill_color {
        apply_color(context, color);
        context
            .fill_preserve()
            .map_err(|err| map_backend_error("failed to fill shape", err))?;
    }
    if let Some(stroke) = stroke {
        apply_color(context, stroke.color);
        context.set_line_width(stroke.width);
        context
            .stroke_preserve()
            .map_err(|err| map_backend_error("failed to stroke shape", err))?;
    }
    context.new_path();
    Ok(())
}

fn save(context: &Context) -> SimResult<()> {
    context
        .save()
        .map_err(|err| map_backend_error("failed to save cairo state", err))
}

fn restore(context: &Context) -> SimResult<()> {
    context
        .restore()
        .map_err(|err| map_backend_error("failed to restore cairo state", err))
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> SimError {
    SimError::Backend(format!("{prefix}: {err}"))
}
