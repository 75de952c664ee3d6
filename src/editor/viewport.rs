use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::{SnapError, SnapResult};

/// Maps between an on-screen preview and the render canvas.
///
/// Editor state is kept in canvas pixels; pointer input arrives in preview pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    preview_width: f64,
    preview_height: f64,
    canvas: Canvas,
}

impl Viewport {
    /// Viewport for a preview of `preview_width × preview_height` showing `canvas`.
    pub fn new(preview_width: f64, preview_height: f64, canvas: Canvas) -> SnapResult<Self> {
        let canvas = canvas.validate()?;
        for v in [preview_width, preview_height] {
            if !v.is_finite() || v <= 0.0 {
                return Err(SnapError::validation("preview size must be finite and > 0"));
            }
        }
        Ok(Self {
            preview_width,
            preview_height,
            canvas,
        })
    }

    /// Canvas shown by this viewport.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Canvas pixels per preview pixel along each axis.
    pub fn scale(&self) -> (f64, f64) {
        (
            f64::from(self.canvas.width) / self.preview_width,
            f64::from(self.canvas.height) / self.preview_height,
        )
    }

    /// Preview point to canvas point.
    pub fn to_canvas(&self, p: Point) -> Point {
        let (sx, sy) = self.scale();
        Point::new(p.x * sx, p.y * sy)
    }

    /// Canvas point to preview point.
    pub fn to_preview(&self, p: Point) -> Point {
        let (sx, sy) = self.scale();
        Point::new(p.x / sx, p.y / sy)
    }

    /// Preview length to canvas length, using the horizontal scale.
    pub fn length_to_canvas(&self, len: f64) -> f64 {
        len * self.scale().0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/viewport.rs"]
mod tests;
