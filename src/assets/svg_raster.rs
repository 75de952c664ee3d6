use crate::assets::store::PreparedImage;
use crate::foundation::error::{SnapError, SnapResult};

// Avoid pathological allocations from oversized sticker sizes.
const MAX_DIM: u32 = 4_096;

/// Pixel size an SVG sticker is rasterized at so its longer side equals `target_px`.
pub fn svg_fit_size(tree: &usvg::Tree, target_px: f64) -> SnapResult<(u32, u32)> {
    let size = tree.size();
    let (w, h) = (f64::from(size.width()), f64::from(size.height()));
    if !w.is_finite() || !h.is_finite() || w <= 0.0 || h <= 0.0 {
        return Err(SnapError::asset("svg has invalid width/height"));
    }
    if !target_px.is_finite() || target_px <= 0.0 {
        return Err(SnapError::validation("sticker size must be finite and > 0"));
    }

    let scale = target_px / w.max(h);
    let out_w = (w * scale).ceil().max(1.0) as u32;
    let out_h = (h * scale).ceil().max(1.0) as u32;
    if out_w > MAX_DIM || out_h > MAX_DIM {
        return Err(SnapError::validation(format!(
            "svg raster size too large: {out_w}x{out_h} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }
    Ok((out_w, out_h))
}

/// Rasterize a parsed SVG into premultiplied RGBA8 of exactly `width × height`.
pub fn rasterize_svg(tree: &usvg::Tree, width: u32, height: u32) -> SnapResult<PreparedImage> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| SnapError::render("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: std::sync::Arc::new(pixmap.data().to_vec()),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg_raster.rs"]
mod tests;
