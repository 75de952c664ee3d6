use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::decode::{decode_image, parse_svg};
use crate::assets::encoded::EncodedImage;
use crate::assets::source::AssetSource;
use crate::assets::store::{
    PreparedAsset, PreparedAssetStore, TextBrushRgba8, TextLayoutEngine,
};
use crate::assets::svg_raster::{rasterize_svg, svg_fit_size};
use crate::compose::plan::{SceneAssets, compile_render};
use crate::compose::spec::{EMOJI_FONT_FAMILY, RenderSpec, StickerSource};
use crate::foundation::core::Rgba8;
use crate::foundation::error::{SnapError, SnapResult};
use crate::render::backend::{RenderedImage, execute_plan};
use crate::render::cpu::CpuBackend;

/// Resolve and decode every asset `spec` needs.
///
/// Any failure aborts the whole render; nothing is drawn with a partial asset set.
pub fn gather_assets(
    spec: &RenderSpec,
    source: &dyn AssetSource,
) -> SnapResult<(PreparedAssetStore, SceneAssets)> {
    let mut store = PreparedAssetStore::new();
    let mut fonts = FontCache::new(source);
    let mut text_engine = TextLayoutEngine::new();

    let base = spec
        .base
        .decode()
        .map_err(|e| SnapError::asset(format!("base image could not be decoded: {e}")))?;
    let base = store.insert(PreparedAsset::Image(base))?;

    let mut stickers = Vec::with_capacity(spec.stickers.len());
    for placement in &spec.stickers {
        let asset = match &placement.source {
            StickerSource::Emoji(emoji) => PreparedAsset::Text(text_engine.layout_line(
                emoji,
                fonts.get(EMOJI_FONT_FAMILY)?,
                placement.size as f32,
                TextBrushRgba8::from(Rgba8::BLACK),
            )?),
            StickerSource::Image(key) => {
                let bytes = source.load_bytes(key)?;
                PreparedAsset::Image(decode_image(&bytes).map_err(|e| {
                    SnapError::asset(format!("sticker '{key}' could not be decoded: {e}"))
                })?)
            }
            StickerSource::Svg(key) => {
                let bytes = source.load_bytes(key)?;
                let svg = parse_svg(&bytes).map_err(|e| {
                    SnapError::asset(format!("sticker '{key}' is not valid svg: {e}"))
                })?;
                let (w, h) = svg_fit_size(&svg.tree, placement.size)?;
                PreparedAsset::Image(rasterize_svg(&svg.tree, w, h)?)
            }
        };
        stickers.push(store.insert(asset)?);
    }

    let mut texts = Vec::with_capacity(spec.texts.len());
    for placement in &spec.texts {
        let layout = text_engine.layout_line(
            &placement.content,
            fonts.get(&placement.font_family)?,
            placement.size as f32,
            TextBrushRgba8::from(placement.color),
        )?;
        texts.push(store.insert(PreparedAsset::Text(layout))?);
    }

    tracing::debug!(assets = store.len(), "gathered render assets");
    Ok((
        store,
        SceneAssets {
            base,
            stickers,
            texts,
        },
    ))
}

/// Render `spec` to a premultiplied raster.
#[tracing::instrument(
    skip(spec, source),
    fields(
        width = spec.canvas.width,
        height = spec.canvas.height,
        stickers = spec.stickers.len(),
        texts = spec.texts.len()
    )
)]
pub fn render_rgba(spec: &RenderSpec, source: &dyn AssetSource) -> SnapResult<RenderedImage> {
    spec.validate()?;
    let (store, scene) = gather_assets(spec, source)?;
    let plan = compile_render(spec, &scene, &store)?;
    let mut backend = CpuBackend::new();
    execute_plan(&mut backend, &plan, &store)
}

/// Render `spec` and encode it with `spec.output`.
///
/// Identical specs and asset sources produce byte-identical output.
pub fn render(spec: &RenderSpec, source: &dyn AssetSource) -> SnapResult<EncodedImage> {
    render_rgba(spec, source)?.encode(spec.output)
}

struct FontCache<'a> {
    source: &'a dyn AssetSource,
    fonts: HashMap<String, Arc<Vec<u8>>>,
}

impl<'a> FontCache<'a> {
    fn new(source: &'a dyn AssetSource) -> Self {
        Self {
            source,
            fonts: HashMap::new(),
        }
    }

    fn get(&mut self, family_stack: &str) -> SnapResult<Arc<Vec<u8>>> {
        if let Some(font) = self.fonts.get(family_stack) {
            return Ok(font.clone());
        }
        let font = Arc::new(self.source.load_font(family_stack)?);
        self.fonts.insert(family_stack.to_owned(), font.clone());
        Ok(font)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
