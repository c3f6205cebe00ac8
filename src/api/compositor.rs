//! Per-tick scene construction for the four surfaces.

use smallvec::smallvec;

use crate::assets::{AssetStore, FallbackShape, SpriteSlot, manifest};
use crate::core::{
    DeviationParameters, Displacement, EyePair, EyeSide, EyesAppearance, Point, RenderGeometry,
};
use crate::interaction::{DragFeedback, ToolKind, ToolSet, ToolState};
use crate::render::{
    CirclePrimitive, Color, DrawCommand, EllipseClip, ImagePrimitive, LayeredFrame,
    LinePrimitive, PolygonPrimitive, RectPrimitive, Stroke, SurfaceKind, TextHAlign,
    TextPrimitive, Transform,
};

use super::CompositorWeights;

const SOCKET_RADIUS_X: f64 = 80.0;
const SOCKET_RADIUS_Y: f64 = 50.0;
const IRIS_RADIUS: f64 = 28.0;
const PUPIL_RADIUS: f64 = 10.0;
/// Pupil size at which the pupil is drawn at `PUPIL_RADIUS`.
const PUPIL_REFERENCE_SIZE: f64 = 3.0;
const REFLEX_OFFSET: f64 = 2.0;
const REFLEX_RADIUS: f64 = 3.0;

const READOUT_FONT_PX: f64 = 14.0;
const GAZE_INDICATOR_INSET: f64 = 100.0;
const GAZE_INDICATOR_Y: f64 = 50.0;
const GAZE_INDICATOR_RADIUS: f64 = 30.0;
const GAZE_INDICATOR_GAIN: f64 = 25.0;

/// Everything one tick reads. Borrowed from the engine so composing never
/// mutates simulation state.
pub(super) struct CompositorInput<'a> {
    pub(super) geometry: &'a RenderGeometry,
    pub(super) assets: &'a AssetStore,
    pub(super) appearance: &'a EyesAppearance,
    pub(super) deviation: &'a DeviationParameters,
    pub(super) displacement: EyePair<Displacement>,
    pub(super) occluder_position: Option<EyeSide>,
    pub(super) tools: &'a ToolSet,
    pub(super) feedback: Option<DragFeedback>,
    pub(super) weights: CompositorWeights,
}

pub(super) fn compose(frame: &mut LayeredFrame, input: &CompositorInput<'_>) {
    frame.clear();
    frame.viewport = input.geometry.surface;

    draw_face(frame, input);
    for side in EyeSide::BOTH {
        if input.occluder_position != Some(side) {
            draw_eye(frame, input, side);
        }
    }
    draw_tools(frame, input);
    draw_overlay(frame, input);
}

fn draw_face(frame: &mut LayeredFrame, input: &CompositorInput<'_>) {
    let geometry = input.geometry;
    if let SpriteSlot::Sprite(_) = input.assets.resolve(manifest::FACE) {
        frame.push(
            SurfaceKind::Face,
            DrawCommand::Image(ImagePrimitive::new(
                manifest::FACE,
                geometry.offset_x,
                geometry.offset_y,
                geometry.render_width,
                geometry.render_height,
            )),
        );
    }
}

fn draw_eye(frame: &mut LayeredFrame, input: &CompositorInput<'_>, side: EyeSide) {
    let geometry = input.geometry;
    let (sx, sy) = (geometry.scale_x, geometry.scale_y);
    let weights = input.weights;
    let eye = input.appearance.eyes.get(side);
    let center = geometry.eye_center_render(side);
    let displacement = input
        .displacement
        .get(side)
        .clamped(weights.displacement_limit);

    let iris = Point::new(
        center.x
            + eye.manual_offset.x * weights.manual_offset * sx
            + displacement.x * weights.displacement * sx,
        center.y
            + eye.manual_offset.y * weights.manual_offset * sy
            + displacement.y * weights.displacement * sy,
    );
    let pupil = Point::new(
        iris.x + eye.pupil_offset.x * weights.pupil_offset * sx,
        iris.y + eye.pupil_offset.y * weights.pupil_offset * sy,
    );

    frame.push(
        SurfaceKind::Iris,
        DrawCommand::PushClip(EllipseClip {
            cx: center.x,
            cy: center.y,
            rx: SOCKET_RADIUS_X * sx,
            ry: SOCKET_RADIUS_Y * sy,
        }),
    );
    frame.push(
        SurfaceKind::Iris,
        DrawCommand::Circle(CirclePrimitive::filled(
            iris.x,
            iris.y,
            IRIS_RADIUS * sx * eye.eye_size,
            eye.iris_color,
        )),
    );
    frame.push(
        SurfaceKind::Iris,
        DrawCommand::Circle(CirclePrimitive::filled(
            pupil.x,
            pupil.y,
            PUPIL_RADIUS * sx * (eye.pupil_size / PUPIL_REFERENCE_SIZE),
            Color::BLACK,
        )),
    );

    let reflex = Point::new(pupil.x + REFLEX_OFFSET * sx, pupil.y - REFLEX_OFFSET * sy);
    let reflex_radius = REFLEX_RADIUS * sx;
    match input.assets.resolve(manifest::LIGHT_REFLEX) {
        SpriteSlot::Sprite(_) => frame.push(
            SurfaceKind::Iris,
            DrawCommand::Image(ImagePrimitive::new(
                manifest::LIGHT_REFLEX,
                reflex.x - reflex_radius,
                reflex.y - reflex_radius,
                reflex_radius * 2.0,
                reflex_radius * 2.0,
            )),
        ),
        SpriteSlot::Fallback(FallbackShape::ReflexDot | FallbackShape::Triangle) => frame.push(
            SurfaceKind::Iris,
            DrawCommand::Circle(CirclePrimitive::filled(
                reflex.x,
                reflex.y,
                reflex_radius,
                Color::WHITE,
            )),
        ),
        SpriteSlot::Fallback(FallbackShape::Omit) => {}
    }

    frame.push(SurfaceKind::Iris, DrawCommand::PopClip);
}

fn draw_tools(frame: &mut LayeredFrame, input: &CompositorInput<'_>) {
    let tools = input.tools;
    for kind in [ToolKind::Occluder, ToolKind::Target] {
        let tool = tools.get(kind);
        if !tool.active {
            continue;
        }
        let sprite = match kind {
            ToolKind::Occluder => manifest::OCCLUDER,
            _ => manifest::TARGET,
        };
        if let SpriteSlot::Sprite(_) = input.assets.resolve(sprite) {
            let origin = input.geometry.design_to_render(tool.sprite_origin());
            frame.push(
                SurfaceKind::Tools,
                DrawCommand::Image(ImagePrimitive::new(
                    sprite,
                    origin.x,
                    origin.y,
                    tool.width * input.geometry.scale_x,
                    tool.height * input.geometry.scale_y,
                )),
            );
        }
    }
    if tools.prism.active {
        draw_prism(frame, input, &tools.prism);
    }
}

fn draw_prism(frame: &mut LayeredFrame, input: &CompositorInput<'_>, prism: &ToolState) {
    let geometry = input.geometry;
    let center = geometry.design_to_render(prism.position);
    let width = prism.width * geometry.scale_x;
    let height = prism.height * geometry.scale_y;
    let half_width = width / 2.0;
    let half_height = height / 2.0;
    let state = input.tools.prism_state;

    frame.push(
        SurfaceKind::Tools,
        DrawCommand::PushTransform(Transform {
            translate_x: center.x,
            translate_y: center.y,
            rotation_deg: f64::from(state.axis),
        }),
    );
    match input.assets.resolve(manifest::PRISM) {
        SpriteSlot::Sprite(_) => frame.push(
            SurfaceKind::Tools,
            DrawCommand::Image(ImagePrimitive::new(
                manifest::PRISM,
                -half_width,
                -half_height,
                width,
                height,
            )),
        ),
        SpriteSlot::Fallback(FallbackShape::Omit) => {}
        SpriteSlot::Fallback(_) => frame.push(
            SurfaceKind::Tools,
            DrawCommand::Polygon(PolygonPrimitive {
                points: smallvec![
                    Point::new(0.0, -half_height),
                    Point::new(half_width, half_height),
                    Point::new(-half_width, half_height),
                ],
                fill_color: Some(Color::rgba8(173, 216, 230, 0.5)),
                stroke: Some(Stroke::new(Color::rgba8(100, 150, 200, 0.8), 2.0)),
            }),
        ),
    }
    frame.push(
        SurfaceKind::Tools,
        DrawCommand::Text(TextPrimitive::new(
            format!("{}\u{394}", state.value),
            0.0,
            -half_height - 10.0,
            READOUT_FONT_PX,
            Color::WHITE,
            TextHAlign::Center,
        )),
    );
    frame.push(
        SurfaceKind::Tools,
        DrawCommand::Line(LinePrimitive::new(
            0.0,
            0.0,
            0.0,
            -height * 0.7,
            2.0,
            Color::rgba(1.0, 1.0, 1.0, 0.7),
        )),
    );
    frame.push(SurfaceKind::Tools, DrawCommand::PopTransform);
}

fn draw_overlay(frame: &mut LayeredFrame, input: &CompositorInput<'_>) {
    let text = |label: String, x: f64, y: f64| {
        DrawCommand::Text(TextPrimitive::new(
            label,
            x,
            y,
            READOUT_FONT_PX,
            Color::WHITE,
            TextHAlign::Left,
        ))
    };

    frame.push(
        SurfaceKind::Overlay,
        DrawCommand::Rect(RectPrimitive::new(10.0, 10.0, 80.0, 60.0, Color::rgba(0.0, 0.0, 0.0, 0.7))),
    );
    frame.push(SurfaceKind::Overlay, text(EyeSide::Left.readout_label().to_owned(), 20.0, 30.0));
    frame.push(SurfaceKind::Overlay, text(EyeSide::Right.readout_label().to_owned(), 50.0, 30.0));
    frame.push(
        SurfaceKind::Overlay,
        text(
            format!("X: {}\u{394}", format_signed_diopters(input.deviation.net_horizontal_tropia())),
            20.0,
            50.0,
        ),
    );
    frame.push(
        SurfaceKind::Overlay,
        text(
            format!("Y: {}\u{394}", format_signed_diopters(input.deviation.net_vertical_tropia())),
            20.0,
            65.0,
        ),
    );

    if input.tools.target.active {
        draw_gaze_indicator(frame, input);
    }
    if let Some(feedback) = input.feedback {
        draw_feedback(frame, input.geometry, feedback);
    }
}

fn draw_gaze_indicator(frame: &mut LayeredFrame, input: &CompositorInput<'_>) {
    let x = f64::from(input.geometry.surface.width) - GAZE_INDICATOR_INSET;
    let y = GAZE_INDICATOR_Y;
    let radius = GAZE_INDICATOR_RADIUS;
    let guide = Color::rgba(1.0, 1.0, 1.0, 0.3);
    let gaze = input.displacement.left;

    frame.push(
        SurfaceKind::Overlay,
        DrawCommand::Circle(CirclePrimitive::filled(x, y, radius, Color::rgba(0.0, 0.0, 0.0, 0.5))),
    );
    frame.push(
        SurfaceKind::Overlay,
        DrawCommand::Line(LinePrimitive::new(x - radius, y, x + radius, y, 1.0, guide)),
    );
    frame.push(
        SurfaceKind::Overlay,
        DrawCommand::Line(LinePrimitive::new(x, y - radius, x, y + radius, 1.0, guide)),
    );
    frame.push(
        SurfaceKind::Overlay,
        DrawCommand::Circle(CirclePrimitive::filled(
            x + gaze.x * GAZE_INDICATOR_GAIN,
            y + gaze.y * GAZE_INDICATOR_GAIN,
            5.0,
            Color::rgba8(0xf0, 0x56, 0x58, 1.0),
        )),
    );
    frame.push(
        SurfaceKind::Overlay,
        DrawCommand::Text(TextPrimitive::new(
            "Gaze",
            x,
            y - radius - 10.0,
            12.0,
            Color::WHITE,
            TextHAlign::Center,
        )),
    );
}

fn draw_feedback(frame: &mut LayeredFrame, geometry: &RenderGeometry, feedback: DragFeedback) {
    let center_x = f64::from(geometry.surface.width) / 2.0;
    let bottom = f64::from(geometry.surface.height);
    frame.push(
        SurfaceKind::Overlay,
        DrawCommand::Rect(RectPrimitive::new(
            center_x - 90.0,
            bottom - 44.0,
            180.0,
            32.0,
            Color::rgba(0.0, 0.0, 0.0, 0.7),
        )),
    );
    frame.push(
        SurfaceKind::Overlay,
        DrawCommand::Text(TextPrimitive::new(
            feedback.label(),
            center_x,
            bottom - 23.0,
            READOUT_FONT_PX,
            Color::WHITE,
            TextHAlign::Center,
        )),
    );
}

/// Rounded diopters as `0`, `+n` or `-n`.
pub(super) fn format_signed_diopters(value: f64) -> String {
    let rounded = value.round() as i64;
    match rounded {
        0 => "0".to_owned(),
        n if n > 0 => format!("+{n}"),
        n => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::format_signed_diopters;

    #[test]
    fn readout_uses_explicit_sign() {
        assert_eq!(format_signed_diopters(0.0), "0");
        assert_eq!(format_signed_diopters(-0.4), "0");
        assert_eq!(format_signed_diopters(14.6), "+15");
        assert_eq!(format_signed_diopters(-8.0), "-8");
    }
}
