//! Design, render and pointer space conversions.
//!
//! Design space is the fixed logical canvas every tool and deviation value
//! is expressed in. Render space is the letterboxed area the face image
//! occupies inside the current surface. Pointer space is surface pixels.

use serde::{Deserialize, Serialize};

use crate::core::types::{EyeSide, Point, Viewport};
use crate::error::{SimError, SimResult};

/// Horizontal eye anchors as a fraction of the face width.
pub const LEFT_EYE_WIDTH_RATIO: f64 = 0.33;
pub const RIGHT_EYE_WIDTH_RATIO: f64 = 0.67;
/// Vertical eye anchor as a fraction of the face height.
pub const EYE_HEIGHT_RATIO: f64 = 0.38;
/// Extra downward shift of both eye anchors, in design units.
pub const EYE_VERTICAL_OFFSET: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignSize {
    pub width: f64,
    pub height: f64,
}

impl Default for DesignSize {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 600.0,
        }
    }
}

impl DesignSize {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Anatomical centre of one eye in design space.
    #[must_use]
    pub fn eye_center(self, side: EyeSide) -> Point {
        let ratio = match side {
            EyeSide::Left => LEFT_EYE_WIDTH_RATIO,
            EyeSide::Right => RIGHT_EYE_WIDTH_RATIO,
        };
        Point::new(
            self.width * ratio,
            self.height * EYE_HEIGHT_RATIO + EYE_VERTICAL_OFFSET,
        )
    }
}

/// Surface pixel size used for a container, optionally never smaller than
/// the design size.
pub fn surface_size(
    container: Viewport,
    design: DesignSize,
    clamp_to_design: bool,
) -> SimResult<Viewport> {
    if !container.is_valid() {
        return Err(SimError::InvalidViewport {
            width: container.width,
            height: container.height,
        });
    }
    if !clamp_to_design {
        return Ok(container);
    }
    let min_width = design.width.ceil() as u32;
    let min_height = design.height.ceil() as u32;
    Ok(Viewport::new(
        container.width.max(min_width),
        container.height.max(min_height),
    ))
}

/// Converts a position relative to the hosting element into surface pixels.
///
/// The element may be displayed at a different size than the surface's
/// backing store (CSS scaling).
pub fn pointer_from_element(
    x: f64,
    y: f64,
    element_width: f64,
    element_height: f64,
    surface: Viewport,
) -> SimResult<Point> {
    if !x.is_finite() || !y.is_finite() {
        return Err(SimError::InvalidData(
            "pointer coordinates must be finite".to_owned(),
        ));
    }
    if !element_width.is_finite()
        || !element_height.is_finite()
        || element_width <= 0.0
        || element_height <= 0.0
    {
        return Err(SimError::InvalidData(
            "element size must be finite and > 0".to_owned(),
        ));
    }
    Ok(Point::new(
        x * f64::from(surface.width) / element_width,
        y * f64::from(surface.height) / element_height,
    ))
}

/// Letterbox fit of the face image inside one surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderGeometry {
    pub surface: Viewport,
    pub design: DesignSize,
    pub render_width: f64,
    pub render_height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl RenderGeometry {
    /// Fits an image of `image_aspect` (width / height) into `surface`.
    ///
    /// The image fills the surface along the axis it is relatively longer on
    /// and is centred along the other one. Pure in its inputs.
    pub fn compute(surface: Viewport, image_aspect: f64, design: DesignSize) -> SimResult<Self> {
        if !surface.is_valid() {
            return Err(SimError::InvalidViewport {
                width: surface.width,
                height: surface.height,
            });
        }
        if !image_aspect.is_finite() || image_aspect <= 0.0 {
            return Err(SimError::InvalidData(format!(
                "image aspect ratio must be finite and > 0, got {image_aspect}"
            )));
        }
        if !design.is_valid() {
            return Err(SimError::InvalidData(
                "design size must be finite and > 0".to_owned(),
            ));
        }

        let width = f64::from(surface.width);
        let height = f64::from(surface.height);
        let surface_aspect = width / height;

        let (render_width, render_height, offset_x, offset_y) = if image_aspect > surface_aspect {
            let render_height = width / image_aspect;
            (width, render_height, 0.0, (height - render_height) / 2.0)
        } else {
            let render_width = height * image_aspect;
            (render_width, height, (width - render_width) / 2.0, 0.0)
        };

        Ok(Self {
            surface,
            design,
            render_width,
            render_height,
            offset_x,
            offset_y,
            scale_x: render_width / design.width,
            scale_y: render_height / design.height,
        })
    }

    #[must_use]
    pub fn design_to_render(&self, point: Point) -> Point {
        Point::new(
            point.x * self.scale_x + self.offset_x,
            point.y * self.scale_y + self.offset_y,
        )
    }

    #[must_use]
    pub fn pointer_to_design(&self, point: Point) -> Point {
        Point::new(
            (point.x - self.offset_x) / self.scale_x,
            (point.y - self.offset_y) / self.scale_y,
        )
    }

    #[must_use]
    pub fn min_scale(&self) -> f64 {
        self.scale_x.min(self.scale_y)
    }

    #[must_use]
    pub fn surface_center(&self) -> Point {
        self.surface.center()
    }

    #[must_use]
    pub fn eye_center_design(&self, side: EyeSide) -> Point {
        self.design.eye_center(side)
    }

    #[must_use]
    pub fn eye_center_render(&self, side: EyeSide) -> Point {
        self.design_to_render(self.design.eye_center(side))
    }

    /// Occluder association radius in surface pixels.
    #[must_use]
    pub fn proximity_threshold(&self, design_radius: f64) -> f64 {
        design_radius * self.min_scale()
    }

    #[must_use]
    pub fn contains_surface_point(&self, point: Point) -> bool {
        point.is_finite()
            && point.x >= 0.0
            && point.y >= 0.0
            && point.x <= f64::from(self.surface.width)
            && point.y <= f64::from(self.surface.height)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn wide_image_is_letterboxed_vertically() {
        let geometry = RenderGeometry::compute(Viewport::new(900, 900), 1.5, DesignSize::default())
            .expect("valid geometry");
        assert_relative_eq!(geometry.render_width, 900.0);
        assert_relative_eq!(geometry.render_height, 600.0);
        assert_relative_eq!(geometry.offset_x, 0.0);
        assert_relative_eq!(geometry.offset_y, 150.0);
        assert_relative_eq!(geometry.scale_x, 1.0);
        assert_relative_eq!(geometry.scale_y, 1.0);
    }

    #[test]
    fn tall_image_is_pillarboxed() {
        let geometry =
            RenderGeometry::compute(Viewport::new(1200, 600), 1.5, DesignSize::default())
                .expect("valid geometry");
        assert_relative_eq!(geometry.render_width, 900.0);
        assert_relative_eq!(geometry.offset_x, 150.0);
        assert_relative_eq!(geometry.offset_y, 0.0);
    }

    #[test]
    fn eye_centres_match_facial_proportions() {
        let design = DesignSize::default();
        assert_relative_eq!(design.eye_center(EyeSide::Left).x, 297.0);
        assert_relative_eq!(design.eye_center(EyeSide::Right).x, 603.0);
        assert_relative_eq!(design.eye_center(EyeSide::Left).y, 303.0);
    }

    #[test]
    fn zero_surface_is_rejected() {
        assert!(RenderGeometry::compute(Viewport::new(0, 600), 1.5, DesignSize::default()).is_err());
        assert!(RenderGeometry::compute(Viewport::new(900, 600), 0.0, DesignSize::default()).is_err());
    }

    #[test]
    fn surface_is_never_smaller_than_design() {
        let surface = surface_size(Viewport::new(640, 480), DesignSize::default(), true)
            .expect("valid container");
        assert_eq!(surface, Viewport::new(900, 600));
        let unclamped = surface_size(Viewport::new(640, 480), DesignSize::default(), false)
            .expect("valid container");
        assert_eq!(unclamped, Viewport::new(640, 480));
    }

    #[test]
    fn element_coordinates_scale_to_surface_pixels() {
        let point = pointer_from_element(225.0, 150.0, 450.0, 300.0, Viewport::new(900, 600))
            .expect("valid pointer");
        assert_relative_eq!(point.x, 450.0);
        assert_relative_eq!(point.y, 300.0);
    }
}
