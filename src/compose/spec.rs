use crate::assets::encoded::{EncodedImage, ImageEncoding};
use crate::compose::filter::{FilterChain, FilterPreset};
use crate::compose::frame_style::FrameStyle;
use crate::foundation::core::{Canvas, ElementId, Point, Rgba8};
use crate::foundation::error::{SnapError, SnapResult};
use crate::foundation::math::Fnv1a64;

/// Font stack used for emoji stickers.
pub const EMOJI_FONT_FAMILY: &str =
    "Noto Color Emoji, Apple Color Emoji, Segoe UI Emoji, emoji, sans-serif";

/// Rotation and mirroring of the base photo around the canvas center.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GeometricTransform {
    /// Clockwise rotation in degrees.
    pub rotation_deg: f64,
    /// Mirror horizontally.
    pub flip_horizontal: bool,
}

/// Slider values plus a named look or raw filter expression.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ColorAdjustment {
    /// Brightness percentage, 100 is unchanged.
    pub brightness: f32,
    /// Contrast percentage, 100 is unchanged.
    pub contrast: f32,
    /// Saturation percentage, 100 is unchanged.
    pub saturation: f32,
    /// Preset name (`"Vintage"`) or CSS filter expression (`"sepia(50%)"`).
    pub filter: String,
}

impl Default for ColorAdjustment {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            filter: FilterPreset::Original.name().to_owned(),
        }
    }
}

impl ColorAdjustment {
    /// Resolve into the chain applied to the base photo.
    pub fn filter_chain(&self) -> SnapResult<FilterChain> {
        for v in [self.brightness, self.contrast, self.saturation] {
            if !v.is_finite() || v < 0.0 {
                return Err(SnapError::validation(
                    "color adjustments must be finite and >= 0",
                ));
            }
        }
        let look = match FilterPreset::from_name(&self.filter) {
            Some(preset) => preset.chain(),
            None => FilterChain::parse(&self.filter)?,
        };
        Ok(FilterChain::from_adjustment(
            self.brightness,
            self.contrast,
            self.saturation,
            &look,
        ))
    }
}

/// What a sticker shows.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StickerSource {
    /// Emoji text drawn with [`EMOJI_FONT_FAMILY`].
    Emoji(String),
    /// Raster image resolved by asset key.
    Image(String),
    /// SVG document resolved by asset key.
    Svg(String),
}

/// One sticker on the photo.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StickerPlacement {
    /// Session-unique id.
    pub id: ElementId,
    /// Sticker content.
    pub source: StickerSource,
    /// Center in canvas pixels.
    pub position: Point,
    /// Font size for emoji, longer side for images.
    pub size: f64,
    /// Clockwise rotation in degrees.
    pub rotation_deg: f64,
}

/// One text element on the photo.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextPlacement {
    /// Session-unique id.
    pub id: ElementId,
    /// Text shown.
    pub content: String,
    /// Center in canvas pixels.
    pub position: Point,
    /// CSS-style family stack, e.g. `"Georgia, serif"`.
    pub font_family: String,
    /// Font size in pixels.
    pub size: f64,
    /// Fill color.
    pub color: Rgba8,
    /// Clockwise rotation in degrees.
    pub rotation_deg: f64,
}

/// Complete, immutable description of one render.
///
/// Drawing order is fixed: transformed base, color adjustment, stickers, texts, frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSpec {
    /// Photo being edited.
    pub base: EncodedImage,
    /// Output size.
    pub canvas: Canvas,
    /// Fill behind the photo and outside rounded frames.
    pub background: Rgba8,
    /// Base photo rotation and mirroring.
    pub transform: GeometricTransform,
    /// Base photo color adjustment.
    pub adjustment: ColorAdjustment,
    /// Stickers in drawing order.
    pub stickers: Vec<StickerPlacement>,
    /// Texts in drawing order.
    pub texts: Vec<TextPlacement>,
    /// Border drawn last.
    pub frame: FrameStyle,
    /// Codec of the rendered output.
    pub output: ImageEncoding,
}

impl RenderSpec {
    /// Spec drawing `base` unchanged on the default export canvas.
    pub fn new(base: EncodedImage) -> Self {
        Self {
            base,
            canvas: Canvas::EXPORT,
            background: Rgba8::WHITE,
            transform: GeometricTransform::default(),
            adjustment: ColorAdjustment::default(),
            stickers: Vec::new(),
            texts: Vec::new(),
            frame: FrameStyle::None,
            output: ImageEncoding::default(),
        }
    }

    /// Check everything that can be checked without loading assets.
    pub fn validate(&self) -> SnapResult<()> {
        self.canvas.validate()?;
        if !self.transform.rotation_deg.is_finite() {
            return Err(SnapError::validation("rotation must be finite"));
        }
        self.adjustment.filter_chain()?;
        for s in &self.stickers {
            check_element(s.id, s.position, s.size, s.rotation_deg)?;
        }
        for t in &self.texts {
            check_element(t.id, t.position, t.size, t.rotation_deg)?;
        }
        Ok(())
    }

    /// Stable hash of everything that affects the output pixels.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        self.base.fingerprint_into(&mut h);
        h.write_u32(self.canvas.width);
        h.write_u32(self.canvas.height);
        write_color(&mut h, self.background);
        h.write_f64(self.transform.rotation_deg);
        h.write_u8(u8::from(self.transform.flip_horizontal));
        h.write_f32(self.adjustment.brightness);
        h.write_f32(self.adjustment.contrast);
        h.write_f32(self.adjustment.saturation);
        h.write_str(&self.adjustment.filter);

        h.write_u64(self.stickers.len() as u64);
        for s in &self.stickers {
            let (tag, value) = match &s.source {
                StickerSource::Emoji(v) => (0u8, v),
                StickerSource::Image(v) => (1, v),
                StickerSource::Svg(v) => (2, v),
            };
            h.write_u8(tag);
            h.write_str(value);
            write_element(&mut h, s.position, s.size, s.rotation_deg);
        }

        h.write_u64(self.texts.len() as u64);
        for t in &self.texts {
            h.write_str(&t.content);
            h.write_str(&t.font_family);
            write_color(&mut h, t.color);
            write_element(&mut h, t.position, t.size, t.rotation_deg);
        }

        h.write_str(self.frame.name());
        match self.output {
            ImageEncoding::Jpeg { quality } => {
                h.write_u8(0);
                h.write_u8(quality);
            }
            ImageEncoding::Png => h.write_u8(1),
        }
        h.finish()
    }
}

fn check_element(id: ElementId, position: Point, size: f64, rotation_deg: f64) -> SnapResult<()> {
    if !position.x.is_finite() || !position.y.is_finite() || !rotation_deg.is_finite() {
        return Err(SnapError::validation(format!(
            "element {} has a non-finite position or rotation",
            id.0
        )));
    }
    if !size.is_finite() || size <= 0.0 {
        return Err(SnapError::validation(format!(
            "element {} size must be finite and > 0",
            id.0
        )));
    }
    Ok(())
}

fn write_color(h: &mut Fnv1a64, c: Rgba8) {
    for v in [c.r, c.g, c.b, c.a] {
        h.write_u8(v);
    }
}

fn write_element(h: &mut Fnv1a64, position: Point, size: f64, rotation_deg: f64) {
    h.write_f64(position.x);
    h.write_f64(position.y);
    h.write_f64(size);
    h.write_f64(rotation_deg);
}

#[cfg(test)]
#[path = "../../tests/unit/compose/spec.rs"]
mod tests;
