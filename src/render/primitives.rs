use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Point;
use crate::error::{SimError, SimResult};

/// RGBA color in normalized 0..=1 channel values.
///
/// Serialized as a CSS hex string (`#rrggbb` or `#rrggbbaa`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// 8-bit channels with a normalized alpha, as in CSS `rgba()`.
    #[must_use]
    pub fn rgba8(red: u8, green: u8, blue: u8, alpha: f64) -> Self {
        Self::rgba(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
            alpha,
        )
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(input: &str) -> SimResult<Self> {
        let invalid = || SimError::InvalidData(format!("invalid hex color `{input}`"));
        let digits = input.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };
        match digits.len() {
            3 => {
                let expand = |index: usize| channel(index..index + 1).map(|value| value * 17);
                Ok(Self::rgba8(expand(0)?, expand(1)?, expand(2)?, 1.0))
            }
            6 => Ok(Self::rgba8(channel(0..2)?, channel(2..4)?, channel(4..6)?, 1.0)),
            8 => Ok(Self::rgba8(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                f64::from(channel(6..8)?) / 255.0,
            )),
            _ => Err(invalid()),
        }
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        let byte = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        if self.alpha >= 1.0 {
            format!(
                "#{:02x}{:02x}{:02x}",
                byte(self.red),
                byte(self.green),
                byte(self.blue)
            )
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                byte(self.red),
                byte(self.green),
                byte(self.blue),
                byte(self.alpha)
            )
        }
    }

    pub fn validate(self) -> SimResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(SimError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = SimError;

    fn try_from(value: String) -> SimResult<Self> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Outline applied to a closed shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

impl Stroke {
    #[must_use]
    pub const fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }

    pub fn validate(self) -> SimResult<()> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(SimError::InvalidData(
                "stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Draw command for one line segment in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            color,
        }
    }

    pub fn validate(self) -> SimResult<()> {
        ensure_finite("line coordinates", &[self.x1, self.y1, self.x2, self.y2])?;
        Stroke::new(self.color, self.stroke_width).validate()
    }
}

/// Filled axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill_color: Color,
}

impl RectPrimitive {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64, fill_color: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill_color,
        }
    }

    pub fn validate(self) -> SimResult<()> {
        ensure_finite("rect geometry", &[self.x, self.y, self.width, self.height])?;
        if self.width < 0.0 || self.height < 0.0 {
            return Err(SimError::InvalidData(
                "rect size must be >= 0".to_owned(),
            ));
        }
        self.fill_color.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CirclePrimitive {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub fill_color: Option<Color>,
    pub stroke: Option<Stroke>,
}

impl CirclePrimitive {
    #[must_use]
    pub const fn filled(cx: f64, cy: f64, radius: f64, fill_color: Color) -> Self {
        Self {
            cx,
            cy,
            radius,
            fill_color: Some(fill_color),
            stroke: None,
        }
    }

    pub fn validate(self) -> SimResult<()> {
        ensure_finite("circle geometry", &[self.cx, self.cy, self.radius])?;
        if self.radius < 0.0 {
            return Err(SimError::InvalidData(
                "circle radius must be >= 0".to_owned(),
            ));
        }
        validate_paint(self.fill_color, self.stroke)
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Draw command for one label in pixel space. `y` is the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.text.is_empty() {
            return Err(SimError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        ensure_finite("text coordinates", &[self.x, self.y])?;
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(SimError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Named sprite stretched into a destination box.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePrimitive {
    pub sprite: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ImagePrimitive {
    #[must_use]
    pub fn new(sprite: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            sprite: sprite.into(),
            x,
            y,
            width,
            height,
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.sprite.is_empty() {
            return Err(SimError::InvalidData(
                "image sprite name must not be empty".to_owned(),
            ));
        }
        ensure_finite("image geometry", &[self.x, self.y, self.width, self.height])?;
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(SimError::InvalidData(
                "image size must be > 0".to_owned(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonPrimitive {
    pub points: SmallVec<[Point; 4]>,
    pub fill_color: Option<Color>,
    pub stroke: Option<Stroke>,
}

impl PolygonPrimitive {
    pub fn validate(&self) -> SimResult<()> {
        if self.points.len() < 3 {
            return Err(SimError::InvalidData(
                "polygon needs at least three points".to_owned(),
            ));
        }
        if self.points.iter().any(|point| !point.is_finite()) {
            return Err(SimError::InvalidData(
                "polygon points must be finite".to_owned(),
            ));
        }
        validate_paint(self.fill_color, self.stroke)
    }
}

/// Elliptical clip region, e.g. one eye socket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseClip {
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
}

impl EllipseClip {
    pub fn validate(self) -> SimResult<()> {
        ensure_finite("clip geometry", &[self.cx, self.cy, self.rx, self.ry])?;
        if self.rx <= 0.0 || self.ry <= 0.0 {
            return Err(SimError::InvalidData(
                "clip radii must be > 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Translation followed by a rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub rotation_deg: f64,
}

impl Transform {
    pub fn validate(self) -> SimResult<()> {
        ensure_finite(
            "transform",
            &[self.translate_x, self.translate_y, self.rotation_deg],
        )
    }
}

/// One entry of a surface's ordered command list.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    PushClip(EllipseClip),
    PopClip,
    PushTransform(Transform),
    PopTransform,
    Line(LinePrimitive),
    Rect(RectPrimitive),
    Circle(CirclePrimitive),
    Polygon(PolygonPrimitive),
    Text(TextPrimitive),
    Image(ImagePrimitive),
}

impl DrawCommand {
    pub fn validate(&self) -> SimResult<()> {
        match self {
            DrawCommand::PushClip(clip) => clip.validate(),
            DrawCommand::PushTransform(transform) => transform.validate(),
            DrawCommand::PopClip | DrawCommand::PopTransform => Ok(()),
            DrawCommand::Line(line) => line.validate(),
            DrawCommand::Rect(rect) => rect.validate(),
            DrawCommand::Circle(circle) => circle.validate(),
            DrawCommand::Polygon(polygon) => polygon.validate(),
            DrawCommand::Text(text) => text.validate(),
            DrawCommand::Image(image) => image.validate(),
        }
    }
}

fn ensure_finite(what: &str, values: &[f64]) -> SimResult<()> {
    if values.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(SimError::InvalidData(format!("{what} must be finite")))
    }
}

fn validate_paint(fill_color: Option<Color>, stroke: Option<Stroke>) -> SimResult<()> {
    if fill_color.is_none() && stroke.is_none() {
        return Err(SimError::InvalidData(
            "shape needs a fill or a stroke".to_owned(),
        ));
    }
    if let Some(color) = fill_color {
        color.validate()?;
    }
    if let Some(stroke) = stroke {
        stroke.validate()?;
    }
    Ok(())
}
