use std::sync::Arc;

use crate::assets::encoded::{EncodedImage, ImageEncoding};
use crate::assets::store::{PreparedAsset, PreparedAssetStore, PreparedImage};
use crate::collage::model::CollageModel;
use crate::compose::plan::{DrawOp, Pass, RenderPlan, ScenePass, SurfaceDesc, SurfaceId};
use crate::foundation::core::{Affine, Canvas, Rect, Rgba8, Vec2};
use crate::foundation::error::{SnapError, SnapResult};
use crate::render::backend::{RenderedImage, execute_plan};
use crate::render::cpu::CpuBackend;

/// Appearance of a rendered collage sheet.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SheetOptions {
    /// Output size.
    pub canvas: Canvas,
    /// Space between cells in pixels.
    pub gap: f64,
    /// Margin around the grid in pixels.
    pub padding: f64,
    /// Sheet color, visible in gaps and empty cells.
    pub background: Rgba8,
    /// Codec used by [`export_collage_sheet`].
    pub output: ImageEncoding,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            canvas: Canvas::EXPORT,
            gap: 8.0,
            padding: 16.0,
            background: Rgba8::WHITE,
            output: ImageEncoding::default(),
        }
    }
}

/// Draw every captured photo into its grid cell, cropped to cover the cell.
#[tracing::instrument(skip(collage, opts), fields(slots = collage.slots().len()))]
pub fn render_collage_sheet(
    collage: &CollageModel,
    opts: &SheetOptions,
) -> SnapResult<RenderedImage> {
    let canvas = opts.canvas.validate()?;
    if !opts.gap.is_finite() || !opts.padding.is_finite() || opts.gap < 0.0 || opts.padding < 0.0
    {
        return Err(SnapError::validation("sheet gap and padding must be >= 0"));
    }

    let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
    let bounds = Rect::new(opts.padding, opts.padding, w - opts.padding, h - opts.padding);
    if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        return Err(SnapError::validation("sheet padding leaves no room for photos"));
    }

    let layout = collage.layout();
    let mut store = PreparedAssetStore::new();
    let mut ops = Vec::new();
    for slot in collage.slots() {
        let Some(image) = slot.image.as_ref() else {
            continue;
        };
        let Some(cell) = layout.cell_rect(slot.index, bounds, opts.gap) else {
            continue;
        };
        if cell.width() <= 0.0 || cell.height() <= 0.0 {
            continue;
        }

        let decoded = image.decode().map_err(|e| {
            SnapError::asset(format!("slot {} could not be decoded: {e}", slot.index))
        })?;
        let cropped = crop_to_aspect(&decoded, cell.width() / cell.height());
        let (cw, ch) = (f64::from(cropped.width), f64::from(cropped.height));
        let asset = store.insert(PreparedAsset::Image(cropped))?;
        ops.push(DrawOp::Image {
            asset,
            transform: Affine::translate(Vec2::new(cell.x0, cell.y0))
                * Affine::scale_non_uniform(cell.width() / cw, cell.height() / ch),
            opacity: 1.0,
        });
    }

    let plan = RenderPlan {
        canvas,
        surfaces: vec![SurfaceDesc {
            width: canvas.width,
            height: canvas.height,
        }],
        passes: vec![Pass::Scene(ScenePass {
            target: SurfaceId(0),
            ops,
            clear: Some(opts.background),
        })],
        final_surface: SurfaceId(0),
    };
    execute_plan(&mut CpuBackend::new(), &plan, &store)
}

/// Render and encode the collage sheet.
pub fn export_collage_sheet(
    collage: &CollageModel,
    opts: &SheetOptions,
) -> SnapResult<EncodedImage> {
    render_collage_sheet(collage, opts)?.encode(opts.output)
}

// Centered crop with the given width/height ratio.
fn crop_to_aspect(img: &PreparedImage, aspect: f64) -> PreparedImage {
    let (w, h) = (f64::from(img.width), f64::from(img.height));
    let (cw, ch) = if w / h > aspect {
        (((h * aspect).round() as u32).clamp(1, img.width), img.height)
    } else {
        (img.width, ((w / aspect).round() as u32).clamp(1, img.height))
    };
    if cw == img.width && ch == img.height {
        return img.clone();
    }

    let x0 = ((img.width - cw) / 2) as usize;
    let y0 = ((img.height - ch) / 2) as usize;
    let stride = img.width as usize * 4;
    let mut out = Vec::with_capacity(cw as usize * ch as usize * 4);
    for row in y0..y0 + ch as usize {
        let start = row * stride + x0 * 4;
        out.extend_from_slice(&img.rgba8_premul[start..start + cw as usize * 4]);
    }
    PreparedImage {
        width: cw,
        height: ch,
        rgba8_premul: Arc::new(out),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/collage/sheet.rs"]
mod tests;
