use std::collections::HashMap;

use kurbo::Shape;

use crate::assets::store::{AssetId, PreparedAsset, PreparedAssetStore};
use crate::compose::plan::{
    CompositeOp, CompositePass, DrawOp, OffscreenPass, PassFx, RenderPlan, ScenePass,
    SurfaceDesc, SurfaceId,
};
use crate::foundation::core::{Affine, BezPath, Point};
use crate::foundation::error::{SnapError, SnapResult};
use crate::render::backend::{PassBackend, RenderedImage};
use crate::render::{blur, composite};

/// Software backend rasterizing with `vello_cpu`.
///
/// Paint caches are keyed by [`AssetId`], so one backend must only be used with one asset store.
#[derive(Default)]
pub struct CpuBackend {
    image_cache: HashMap<AssetId, vello_cpu::Image>,
    font_cache: HashMap<AssetId, vello_cpu::peniko::FontData>,
    surfaces: HashMap<SurfaceId, CpuSurface>,
}

struct CpuSurface {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
}

impl CpuBackend {
    /// Backend with empty caches.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PassBackend for CpuBackend {
    fn ensure_surface(&mut self, id: SurfaceId, desc: &SurfaceDesc) -> SnapResult<()> {
        let width_u16: u16 = desc
            .width
            .try_into()
            .map_err(|_| SnapError::render("surface width exceeds u16"))?;
        let height_u16: u16 = desc
            .height
            .try_into()
            .map_err(|_| SnapError::render("surface height exceeds u16"))?;

        let fresh = || CpuSurface {
            width: width_u16,
            height: height_u16,
            pixmap: vello_cpu::Pixmap::new(width_u16, height_u16),
        };
        match self.surfaces.get_mut(&id) {
            Some(surface) => {
                if surface.width != width_u16 || surface.height != height_u16 {
                    *surface = fresh();
                }
            }
            None => {
                self.surfaces.insert(id, fresh());
            }
        }
        Ok(())
    }

    fn exec_scene(&mut self, pass: &ScenePass, assets: &PreparedAssetStore) -> SnapResult<()> {
        let mut surface = self.surfaces.remove(&pass.target).ok_or_else(|| {
            SnapError::render(format!(
                "scene target surface {:?} was not initialized",
                pass.target
            ))
        })?;

        if let Some(color) = pass.clear {
            composite::fill_in_place(surface.pixmap.data_as_u8_slice_mut(), color.to_premul());
        }

        if !pass.ops.is_empty() {
            // Draw into a transparent scratch pixmap, then blend over what the surface holds.
            let mut ctx = vello_cpu::RenderContext::new(surface.width, surface.height);
            let drawn = pass
                .ops
                .iter()
                .try_for_each(|op| draw_op(self, &mut ctx, op, assets));
            if let Err(e) = drawn {
                self.surfaces.insert(pass.target, surface);
                return Err(e);
            }
            ctx.flush();
            let mut layer = vello_cpu::Pixmap::new(surface.width, surface.height);
            ctx.render_to_pixmap(&mut layer);
            composite::over_in_place(
                surface.pixmap.data_as_u8_slice_mut(),
                layer.data_as_u8_slice(),
                1.0,
            )?;
        }

        self.surfaces.insert(pass.target, surface);
        Ok(())
    }

    fn exec_offscreen(
        &mut self,
        pass: &OffscreenPass,
        _assets: &PreparedAssetStore,
    ) -> SnapResult<()> {
        let mut output = self.surfaces.remove(&pass.output).ok_or_else(|| {
            SnapError::render(format!(
                "offscreen output surface {:?} was not initialized",
                pass.output
            ))
        })?;

        let (w, h) = (u32::from(output.width), u32::from(output.height));
        let mut bytes = if pass.input == pass.output {
            output.pixmap.data_as_u8_slice().to_vec()
        } else {
            let input = self.surfaces.get(&pass.input).ok_or_else(|| {
                SnapError::render(format!(
                    "offscreen input surface {:?} was not initialized",
                    pass.input
                ))
            })?;
            if input.width != output.width || input.height != output.height {
                self.surfaces.insert(pass.output, output);
                return Err(SnapError::render(
                    "offscreen input/output surface size mismatch",
                ));
            }
            input.pixmap.data_as_u8_slice().to_vec()
        };

        let result = match &pass.fx {
            PassFx::ColorFilter(chain) => chain.apply_rgba8_premul_in_place(&mut bytes),
            PassFx::Blur { radius_px, sigma } => {
                blur::blur_rgba8_premul(&bytes, w, h, *radius_px, *sigma).map(|b| bytes = b)
            }
            PassFx::RoundedMask { radius } => {
                let mask = rounded_rect_mask(output.width, output.height, *radius);
                composite::mask_alpha_in_place(&mut bytes, mask.data_as_u8_slice())
            }
        };
        if result.is_ok() {
            output.pixmap.data_as_u8_slice_mut().copy_from_slice(&bytes);
        }

        self.surfaces.insert(pass.output, output);
        result
    }

    fn exec_composite(
        &mut self,
        pass: &CompositePass,
        _assets: &PreparedAssetStore,
    ) -> SnapResult<()> {
        let mut dst = self.surfaces.remove(&pass.target).ok_or_else(|| {
            SnapError::render(format!(
                "composite target surface {:?} was not initialized",
                pass.target
            ))
        })?;

        let mut result = Ok(());
        for op in &pass.ops {
            let CompositeOp::Over { src, opacity } = *op;
            result = match self.surfaces.get(&src) {
                Some(src) => composite::over_in_place(
                    dst.pixmap.data_as_u8_slice_mut(),
                    src.pixmap.data_as_u8_slice(),
                    opacity,
                ),
                None => Err(SnapError::render(format!(
                    "composite src surface {src:?} was not initialized"
                ))),
            };
            if result.is_err() {
                break;
            }
        }
        self.surfaces.insert(pass.target, dst);
        result
    }

    fn readback_rgba8(&mut self, surface: SurfaceId, plan: &RenderPlan) -> SnapResult<RenderedImage> {
        let s = self.surfaces.get(&surface).ok_or_else(|| {
            SnapError::render(format!(
                "readback surface {surface:?} was not initialized"
            ))
        })?;
        let rgba8_premul = s.pixmap.data_as_u8_slice().to_vec();
        let surface_cap = plan.surfaces.len() as u32;
        self.surfaces.retain(|id, _| id.0 < surface_cap);

        Ok(RenderedImage {
            width: plan.canvas.width,
            height: plan.canvas.height,
            rgba8_premul,
        })
    }
}

fn draw_op(
    backend: &mut CpuBackend,
    ctx: &mut vello_cpu::RenderContext,
    op: &DrawOp,
    assets: &PreparedAssetStore,
) -> SnapResult<()> {
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

    match op {
        DrawOp::FillPath {
            path,
            transform,
            color,
        } => {
            ctx.set_transform(affine_to_cpu(*transform));
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                color.r, color.g, color.b, color.a,
            ));
            ctx.fill_path(&bezpath_to_cpu(path));
            Ok(())
        }
        DrawOp::Image {
            asset,
            transform,
            opacity,
        } => {
            let image_paint = backend.image_paint_for(*asset, assets)?;
            let (w, h) = image_paint_size(&image_paint)?;

            ctx.set_transform(affine_to_cpu(*transform));
            ctx.set_paint(image_paint);

            if *opacity < 1.0 {
                ctx.push_opacity_layer(*opacity);
            }
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
            if *opacity < 1.0 {
                ctx.pop_layer();
            }
            Ok(())
        }
        DrawOp::Text { asset, transform } => {
            let text = assets.text(*asset)?;
            let font = backend.font_for_text_asset(*asset, assets)?;
            ctx.set_transform(affine_to_cpu(*transform));

            for line in text.layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };

                    let brush = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        brush.r, brush.g, brush.b, brush.a,
                    ));

                    let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(&font)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
            Ok(())
        }
    }
}

// Coverage of a rounded rectangle spanning the whole surface, rasterized as an opaque fill.
fn rounded_rect_mask(width: u16, height: u16, radius: f64) -> vello_cpu::Pixmap {
    let shape = kurbo::RoundedRect::new(0.0, 0.0, f64::from(width), f64::from(height), radius);
    let mut ctx = vello_cpu::RenderContext::new(width, height);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
    ctx.fill_path(&bezpath_to_cpu(&shape.to_path(0.1)));
    ctx.flush();

    let mut mask = vello_cpu::Pixmap::new(width, height);
    ctx.render_to_pixmap(&mut mask);
    mask
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> SnapResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| SnapError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| SnapError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(SnapError::render("prepared image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn image_paint_size(image: &vello_cpu::Image) -> SnapResult<(f64, f64)> {
    match &image.image {
        vello_cpu::ImageSource::Pixmap(p) => Ok((f64::from(p.width()), f64::from(p.height()))),
        vello_cpu::ImageSource::OpaqueId(_) => Err(SnapError::render(
            "cpu backend does not support opaque image ids",
        )),
    }
}

impl CpuBackend {
    fn image_paint_for(
        &mut self,
        id: AssetId,
        assets: &PreparedAssetStore,
    ) -> SnapResult<vello_cpu::Image> {
        if let Some(paint) = self.image_cache.get(&id) {
            return Ok(paint.clone());
        }

        let img = assets.image(id)?;
        let pixmap =
            image_premul_bytes_to_pixmap(img.rgba8_premul.as_slice(), img.width, img.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(std::sync::Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };

        self.image_cache.insert(id, paint.clone());
        Ok(paint)
    }

    fn font_for_text_asset(
        &mut self,
        id: AssetId,
        assets: &PreparedAssetStore,
    ) -> SnapResult<vello_cpu::peniko::FontData> {
        if let Some(font) = self.font_cache.get(&id) {
            return Ok(font.clone());
        }

        let PreparedAsset::Text(t) = assets.get(id)? else {
            return Err(SnapError::render("AssetId is not a PreparedText"));
        };

        let font_bytes = t.font_bytes.as_ref().clone();
        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        self.font_cache.insert(id, font.clone());
        Ok(font)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
