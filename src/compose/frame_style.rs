use kurbo::{RoundedRect, Shape};

use crate::foundation::core::{BezPath, Canvas, Rgba8};
use crate::foundation::error::{SnapError, SnapResult};

// Frame metrics are authored against the 384px editor preview.
const PREVIEW_SIDE: f64 = 384.0;
const PATH_TOLERANCE: f64 = 0.1;

/// Border styles offered by the editor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FrameStyle {
    /// No border.
    #[default]
    None,
    /// Thick white border.
    White,
    /// Thick black border.
    Black,
    /// Thick gold border.
    Gold,
    /// White border with a deeper bottom edge.
    Polaroid,
    /// Thin white border with large rounded corners.
    Rounded,
    /// Thin brown border with rounded corners.
    Vintage,
    /// Thin pink border with rounded corners and a glow.
    Neon,
}

/// Soft halo drawn under a frame border.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameGlow {
    /// Halo color.
    pub color: Rgba8,
    /// Blur radius in canvas pixels.
    pub radius_px: u32,
    /// Halo opacity.
    pub opacity: f32,
}

/// Resolved border metrics for one canvas size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameGeometry {
    /// Top, right, bottom and left border widths in canvas pixels.
    pub insets: [f64; 4],
    /// Outer corner radius in canvas pixels.
    pub radius: f64,
    /// Border color.
    pub color: Rgba8,
    /// Optional halo.
    pub glow: Option<FrameGlow>,
}

impl FrameStyle {
    /// Every style in display order.
    pub const ALL: [FrameStyle; 8] = [
        Self::None,
        Self::White,
        Self::Black,
        Self::Gold,
        Self::Polaroid,
        Self::Rounded,
        Self::Vintage,
        Self::Neon,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::White => "White",
            Self::Black => "Black",
            Self::Gold => "Gold",
            Self::Polaroid => "Polaroid",
            Self::Rounded => "Rounded",
            Self::Vintage => "Vintage",
            Self::Neon => "Neon",
        }
    }

    /// Case-insensitive lookup by display name; the empty string means [`FrameStyle::None`].
    pub fn from_name(name: &str) -> SnapResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(Self::None);
        }
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| SnapError::validation(format!("unknown frame style '{name}'")))
    }

    /// Border metrics scaled to `canvas`, or `None` for [`FrameStyle::None`].
    pub fn geometry(self, canvas: Canvas) -> Option<FrameGeometry> {
        let (border, bottom, radius, color) = match self {
            Self::None => return None,
            Self::White => (8.0, 8.0, 0.0, Rgba8::WHITE),
            Self::Black => (8.0, 8.0, 0.0, Rgba8::BLACK),
            Self::Gold => (8.0, 8.0, 0.0, Rgba8::rgb(0xFA, 0xCC, 0x15)),
            Self::Polaroid => (8.0, 16.0, 0.0, Rgba8::WHITE),
            Self::Rounded => (4.0, 4.0, 16.0, Rgba8::WHITE),
            Self::Vintage => (4.0, 4.0, 8.0, Rgba8::rgb(0x92, 0x40, 0x0E)),
            Self::Neon => (4.0, 4.0, 8.0, Rgba8::rgb(0xEC, 0x48, 0x99)),
        };

        let scale = f64::from(canvas.width.min(canvas.height)) / PREVIEW_SIDE;
        let glow = (self == Self::Neon).then(|| FrameGlow {
            color,
            radius_px: (10.0 * scale).round().max(1.0) as u32,
            opacity: 0.5,
        });
        Some(FrameGeometry {
            insets: [
                border * scale,
                border * scale,
                bottom * scale,
                border * scale,
            ],
            radius: radius * scale,
            color,
            glow,
        })
    }
}

impl FrameGeometry {
    /// Filled ring between the canvas edge and the inner photo window.
    ///
    /// The window winds opposite to the outer edge, so it stays empty under the non-zero rule.
    pub fn border_path(&self, canvas: Canvas) -> BezPath {
        let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
        let [top, right, bottom, left] = self.insets;

        let mut path = RoundedRect::new(0.0, 0.0, w, h, self.radius).to_path(PATH_TOLERANCE);

        let inner_radius = (self.radius - top.max(left)).max(0.0);
        let (x1, y1) = ((w - right).max(left), (h - bottom).max(top));
        let window = RoundedRect::new(left, top, x1, y1, inner_radius).to_path(PATH_TOLERANCE);
        path.extend(window.reverse_subpaths());
        path
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/frame_style.rs"]
mod tests;
