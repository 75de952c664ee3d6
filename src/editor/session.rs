use crate::assets::encoded::{EncodedImage, ImageEncoding};
use crate::assets::source::AssetSource;
use crate::compose::filter::{FilterChain, FilterPreset};
use crate::compose::frame_style::FrameStyle;
use crate::compose::spec::{
    ColorAdjustment, GeometricTransform, RenderSpec, StickerPlacement, StickerSource,
    TextPlacement,
};
use crate::editor::catalog::FONTS;
use crate::foundation::core::{Canvas, ElementId, Point, Rgba8};
use crate::foundation::error::{SnapError, SnapResult};
use crate::render::backend::RenderedImage;
use crate::render::pipeline::{render, render_rgba};

/// Size of newly added stickers in canvas pixels.
pub const DEFAULT_STICKER_SIZE: f64 = 48.0;
/// Longest accepted text content, in characters.
pub const MAX_TEXT_CHARS: usize = 50;

/// Slider ranges as `(min, max)` percentages.
pub const BRIGHTNESS_RANGE: (f32, f32) = (50.0, 150.0);
/// See [`BRIGHTNESS_RANGE`].
pub const CONTRAST_RANGE: (f32, f32) = (50.0, 150.0);
/// See [`BRIGHTNESS_RANGE`].
pub const SATURATION_RANGE: (f32, f32) = (0.0, 200.0);

/// Feature sets a host enables in the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditorFeatures {
    /// Named filters and color sliders.
    pub filters: bool,
    /// Frame styles.
    pub frames: bool,
    /// Sticker layer.
    pub stickers: bool,
    /// Text layer.
    pub text: bool,
}

impl Default for EditorFeatures {
    fn default() -> Self {
        Self {
            filters: true,
            frames: true,
            stickers: true,
            text: true,
        }
    }
}

impl EditorFeatures {
    fn require(enabled: bool, what: &str) -> SnapResult<()> {
        if enabled {
            Ok(())
        } else {
            Err(SnapError::validation(format!("{what} are disabled")))
        }
    }
}

/// Look of newly added text.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Family stack.
    pub font_family: String,
    /// Size in canvas pixels.
    pub size: f64,
    /// Fill color.
    pub color: Rgba8,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: FONTS[0].family.to_owned(),
            size: 32.0,
            color: Rgba8::WHITE,
        }
    }
}

/// Layer an [`ElementId`] belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    /// A sticker.
    Sticker,
    /// A text element.
    Text,
}

#[derive(Clone, Debug)]
struct PreviewCache {
    fingerprint: u64,
    image: RenderedImage,
}

/// Editing state for one photo.
///
/// All mutations touch only this value; pixels are produced on demand from
/// [`EditorSession::build_render_spec`].
#[derive(Clone, Debug)]
pub struct EditorSession {
    base: EncodedImage,
    canvas: Canvas,
    output: ImageEncoding,
    features: EditorFeatures,
    transform: GeometricTransform,
    adjustment: ColorAdjustment,
    frame: FrameStyle,
    stickers: Vec<StickerPlacement>,
    texts: Vec<TextPlacement>,
    next_id: u64,
    dragging: Option<ElementId>,
    preview: Option<PreviewCache>,
}

impl EditorSession {
    /// Start editing `base` on the default export canvas with every feature enabled.
    pub fn new(base: EncodedImage) -> Self {
        Self::with_options(base, Canvas::EXPORT, EditorFeatures::default())
    }

    /// Start editing with an explicit canvas and feature set.
    pub fn with_options(base: EncodedImage, canvas: Canvas, features: EditorFeatures) -> Self {
        Self {
            base,
            canvas,
            output: ImageEncoding::default(),
            features,
            transform: GeometricTransform::default(),
            adjustment: ColorAdjustment::default(),
            frame: FrameStyle::None,
            stickers: Vec::new(),
            texts: Vec::new(),
            next_id: 1,
            dragging: None,
            preview: None,
        }
    }

    /// Codec used by [`EditorSession::commit`].
    pub fn set_output(&mut self, output: ImageEncoding) {
        self.output = output;
    }

    /// Current base photo.
    pub fn base(&self) -> &EncodedImage {
        &self.base
    }

    /// Render canvas.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Enabled feature sets.
    pub fn features(&self) -> EditorFeatures {
        self.features
    }

    /// Stickers in drawing order.
    pub fn stickers(&self) -> &[StickerPlacement] {
        &self.stickers
    }

    /// Texts in drawing order.
    pub fn texts(&self) -> &[TextPlacement] {
        &self.texts
    }

    /// Current color adjustment.
    pub fn adjustment(&self) -> &ColorAdjustment {
        &self.adjustment
    }

    /// Current base transform.
    pub fn transform(&self) -> GeometricTransform {
        self.transform
    }

    /// Current frame.
    pub fn frame(&self) -> FrameStyle {
        self.frame
    }

    /// Layer holding `id`, if any.
    pub fn element_kind(&self, id: ElementId) -> Option<ElementKind> {
        if self.stickers.iter().any(|s| s.id == id) {
            Some(ElementKind::Sticker)
        } else if self.texts.iter().any(|t| t.id == id) {
            Some(ElementKind::Text)
        } else {
            None
        }
    }

    fn alloc_id(&mut self) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a sticker at the canvas center.
    pub fn add_sticker(&mut self, source: StickerSource) -> SnapResult<ElementId> {
        EditorFeatures::require(self.features.stickers, "stickers")?;
        let key = match &source {
            StickerSource::Emoji(v) | StickerSource::Image(v) | StickerSource::Svg(v) => v,
        };
        if key.trim().is_empty() {
            return Err(SnapError::validation("sticker source must not be empty"));
        }

        let id = self.alloc_id();
        self.stickers.push(StickerPlacement {
            id,
            source,
            position: self.canvas.center(),
            size: DEFAULT_STICKER_SIZE,
            rotation_deg: 0.0,
        });
        tracing::debug!(id = id.0, "sticker added");
        Ok(id)
    }

    /// Add a text element at the canvas center.
    ///
    /// Blank content is rejected and content is cut to [`MAX_TEXT_CHARS`].
    pub fn add_text(&mut self, content: &str, style: TextStyle) -> SnapResult<ElementId> {
        EditorFeatures::require(self.features.text, "text elements")?;
        let content = normalize_text(content)?;
        if !style.size.is_finite() || style.size <= 0.0 {
            return Err(SnapError::validation("text size must be finite and > 0"));
        }

        let id = self.alloc_id();
        self.texts.push(TextPlacement {
            id,
            content,
            position: self.canvas.center(),
            font_family: style.font_family,
            size: style.size,
            color: style.color,
            rotation_deg: 0.0,
        });
        tracing::debug!(id = id.0, "text added");
        Ok(id)
    }

    /// Move an element's center to `(x, y)` in canvas pixels.
    ///
    /// Unknown ids are ignored; returns whether an element moved.
    pub fn move_element(&mut self, id: ElementId, x: f64, y: f64) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        let p = Point::new(x, y);
        if let Some(s) = self.stickers.iter_mut().find(|s| s.id == id) {
            s.position = p;
            true
        } else if let Some(t) = self.texts.iter_mut().find(|t| t.id == id) {
            t.position = p;
            true
        } else {
            false
        }
    }

    /// Set an element's rotation in degrees.
    pub fn rotate_element(&mut self, id: ElementId, rotation_deg: f64) -> bool {
        if !rotation_deg.is_finite() {
            return false;
        }
        if let Some(s) = self.stickers.iter_mut().find(|s| s.id == id) {
            s.rotation_deg = rotation_deg;
            true
        } else if let Some(t) = self.texts.iter_mut().find(|t| t.id == id) {
            t.rotation_deg = rotation_deg;
            true
        } else {
            false
        }
    }

    /// Replace the content of a text element.
    ///
    /// Returns `Ok(false)` for an unknown id.
    pub fn update_text(&mut self, id: ElementId, content: &str) -> SnapResult<bool> {
        let content = normalize_text(content)?;
        match self.texts.iter_mut().find(|t| t.id == id) {
            Some(t) => {
                t.content = content;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a sticker or text element.
    pub fn remove_element(&mut self, id: ElementId) -> bool {
        let before = self.stickers.len() + self.texts.len();
        self.stickers.retain(|s| s.id != id);
        self.texts.retain(|t| t.id != id);
        if self.dragging == Some(id) {
            self.dragging = None;
        }
        before != self.stickers.len() + self.texts.len()
    }

    /// Start dragging an element. Returns `false` for an unknown id.
    pub fn begin_drag(&mut self, id: ElementId) -> bool {
        if self.element_kind(id).is_none() {
            return false;
        }
        self.dragging = Some(id);
        true
    }

    /// Move the dragged element's center to `p`; the latest call wins.
    pub fn drag_to(&mut self, p: Point) -> bool {
        match self.dragging {
            Some(id) => self.move_element(id, p.x, p.y),
            None => false,
        }
    }

    /// Stop dragging.
    pub fn end_drag(&mut self) {
        self.dragging = None;
    }

    /// Element currently being dragged.
    pub fn dragging(&self) -> Option<ElementId> {
        self.dragging
    }

    /// Apply a named look (`"Vintage"`) or raw filter expression.
    ///
    /// `"none"` and the empty string select the unfiltered look.
    pub fn set_filter(&mut self, name: &str) -> SnapResult<()> {
        EditorFeatures::require(self.features.filters, "filters")?;
        let filter = match FilterPreset::from_name(name) {
            Some(preset) => preset.name().to_owned(),
            None => {
                FilterChain::parse(name)?;
                name.trim().to_owned()
            }
        };
        self.adjustment.filter = filter;
        Ok(())
    }

    /// Select a frame by name.
    pub fn set_frame(&mut self, name: &str) -> SnapResult<()> {
        EditorFeatures::require(self.features.frames, "frames")?;
        self.frame = FrameStyle::from_name(name)?;
        Ok(())
    }

    /// Set slider values; each is clamped to its range.
    pub fn set_adjustment(
        &mut self,
        brightness: f32,
        contrast: f32,
        saturation: f32,
    ) -> SnapResult<()> {
        EditorFeatures::require(self.features.filters, "filters")?;
        if ![brightness, contrast, saturation]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(SnapError::validation("color adjustments must be finite"));
        }
        self.adjustment.brightness = brightness.clamp(BRIGHTNESS_RANGE.0, BRIGHTNESS_RANGE.1);
        self.adjustment.contrast = contrast.clamp(CONTRAST_RANGE.0, CONTRAST_RANGE.1);
        self.adjustment.saturation = saturation.clamp(SATURATION_RANGE.0, SATURATION_RANGE.1);
        Ok(())
    }

    /// Set the base rotation, normalized into `[0, 360)`.
    pub fn set_rotation(&mut self, rotation_deg: f64) -> SnapResult<()> {
        if !rotation_deg.is_finite() {
            return Err(SnapError::validation("rotation must be finite"));
        }
        self.transform.rotation_deg = rotation_deg.rem_euclid(360.0);
        Ok(())
    }

    /// Rotate the base a quarter turn counter-clockwise.
    pub fn rotate_left(&mut self) {
        self.transform.rotation_deg = (self.transform.rotation_deg - 90.0).rem_euclid(360.0);
    }

    /// Rotate the base a quarter turn clockwise.
    pub fn rotate_right(&mut self) {
        self.transform.rotation_deg = (self.transform.rotation_deg + 90.0).rem_euclid(360.0);
    }

    /// Toggle horizontal mirroring of the base.
    pub fn toggle_flip(&mut self) {
        self.transform.flip_horizontal = !self.transform.flip_horizontal;
    }

    /// Snapshot of the current state as a render description.
    pub fn build_render_spec(&self) -> RenderSpec {
        RenderSpec {
            canvas: self.canvas,
            transform: self.transform,
            adjustment: self.adjustment.clone(),
            stickers: self.stickers.clone(),
            texts: self.texts.clone(),
            frame: self.frame,
            output: self.output,
            ..RenderSpec::new(self.base.clone())
        }
    }

    /// Render the current state, reusing the last raster when nothing changed.
    pub fn render_preview(&mut self, assets: &dyn AssetSource) -> SnapResult<&RenderedImage> {
        let spec = self.build_render_spec();
        let fingerprint = spec.fingerprint();
        let stale = self
            .preview
            .as_ref()
            .is_none_or(|p| p.fingerprint != fingerprint);
        if stale {
            let image = render_rgba(&spec, assets)?;
            self.preview = Some(PreviewCache { fingerprint, image });
        }
        match &self.preview {
            Some(p) => Ok(&p.image),
            None => Err(SnapError::render("preview cache empty after render")),
        }
    }

    /// Flatten everything into a new base photo and reset layers and adjustments.
    ///
    /// On error the session is left untouched.
    #[tracing::instrument(skip(self, assets), fields(stickers = self.stickers.len(), texts = self.texts.len()))]
    pub fn commit(&mut self, assets: &dyn AssetSource) -> SnapResult<EncodedImage> {
        let flattened = render(&self.build_render_spec(), assets)?;
        self.base = flattened.clone();
        self.transform = GeometricTransform::default();
        self.adjustment = ColorAdjustment::default();
        self.frame = FrameStyle::None;
        self.stickers.clear();
        self.texts.clear();
        self.dragging = None;
        self.preview = None;
        Ok(flattened)
    }
}

fn normalize_text(content: &str) -> SnapResult<String> {
    if content.trim().is_empty() {
        return Err(SnapError::validation("text must not be empty"));
    }
    Ok(content.chars().take(MAX_TEXT_CHARS).collect())
}

#[cfg(test)]
#[path = "../../tests/unit/editor/session.rs"]
mod tests;
