use std::sync::Arc;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{SnapError, SnapResult};

#[derive(Clone, Debug)]
/// Prepared raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

#[derive(Clone, Debug)]
/// Prepared SVG asset represented as a parsed `usvg` tree.
pub struct PreparedSvg {
    /// Parsed SVG tree.
    pub tree: Arc<usvg::Tree>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

#[derive(Clone)]
/// Shaped single-line text plus the font bytes its glyph ids refer to.
pub struct PreparedText {
    /// Fully built text layout ready for rendering.
    pub layout: Arc<parley::Layout<TextBrushRgba8>>,
    /// Font bytes used to build glyph outlines.
    pub font_bytes: Arc<Vec<u8>>,
    /// Layout box width in pixels.
    pub width: f64,
    /// Layout box height in pixels.
    pub height: f64,
}

impl std::fmt::Debug for PreparedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedText")
            .field("layout_ptr", &Arc::as_ptr(&self.layout))
            .field("font_bytes_len", &self.font_bytes.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

#[derive(Clone, Debug)]
/// Union of prepared asset kinds the renderer can draw.
pub enum PreparedAsset {
    /// Bitmap image (base photo, raster sticker, rasterized SVG sticker).
    Image(PreparedImage),
    /// Shaped text (text element or emoji sticker).
    Text(PreparedText),
}

/// Index of a prepared asset inside one [`PreparedAssetStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(pub u32);

/// Ready-to-draw assets for one render.
///
/// Filled completely by the gather phase before any pass executes; renderers never perform IO.
#[derive(Clone, Debug, Default)]
pub struct PreparedAssetStore {
    assets: Vec<PreparedAsset>,
}

impl PreparedAssetStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset and return its id.
    pub fn insert(&mut self, asset: PreparedAsset) -> SnapResult<AssetId> {
        let id = u32::try_from(self.assets.len())
            .map_err(|_| SnapError::render("asset id overflow"))?;
        self.assets.push(asset);
        Ok(AssetId(id))
    }

    /// Look up a prepared asset.
    pub fn get(&self, id: AssetId) -> SnapResult<&PreparedAsset> {
        self.assets
            .get(id.0 as usize)
            .ok_or_else(|| SnapError::render(format!("unknown asset id {}", id.0)))
    }

    /// Look up a prepared image.
    pub fn image(&self, id: AssetId) -> SnapResult<&PreparedImage> {
        match self.get(id)? {
            PreparedAsset::Image(img) => Ok(img),
            PreparedAsset::Text(_) => Err(SnapError::render("AssetId is not a PreparedImage")),
        }
    }

    /// Look up prepared text.
    pub fn text(&self, id: AssetId) -> SnapResult<&PreparedText> {
        match self.get(id)? {
            PreparedAsset::Text(t) => Ok(t),
            PreparedAsset::Image(_) => Err(SnapError::render("AssetId is not a PreparedText")),
        }
    }

    /// Number of stored assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Return `true` when nothing has been gathered.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

/// Normalize and validate asset-root-relative paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> SnapResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(SnapError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(SnapError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(SnapError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(SnapError::validation("asset path must contain a file name"));
    }

    Ok(out.join("/"))
}

/// Stateful helper for building Parley text layouts from raw font bytes.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Shape a single unwrapped line of text with the given font bytes and styling.
    pub fn layout_line(
        &mut self,
        text: &str,
        font_bytes: Arc<Vec<u8>>,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> SnapResult<PreparedText> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(SnapError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font_bytes.as_ref().clone()),
            None,
        );
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| SnapError::asset("no font families registered from font bytes"))?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| SnapError::asset("registered font family has no name"))?
            .to_string();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        let mut width = 0.0f64;
        let mut height = 0.0f64;
        for line in layout.lines() {
            let m = line.metrics();
            width = width.max(f64::from(m.advance));
            height += f64::from(m.ascent + m.descent + m.leading);
        }
        Ok(PreparedText {
            layout: Arc::new(layout),
            font_bytes,
            width,
            height,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
