use crate::assets::encoded::{EncodedImage, ImageEncoding};
use crate::assets::store::PreparedAssetStore;
use crate::compose::plan::{
    CompositePass, OffscreenPass, Pass, RenderPlan, ScenePass, SurfaceDesc, SurfaceId,
};
use crate::foundation::error::{SnapError, SnapResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Flat raster produced by a render, premultiplied RGBA8.
pub struct RenderedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major premultiplied RGBA8.
    pub rgba8_premul: Vec<u8>,
}

impl RenderedImage {
    /// Straight-alpha copy of the pixels.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.rgba8_premul.clone();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }

    /// Straight-alpha pixel at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let mut px = [0u8; 4];
        px.copy_from_slice(self.rgba8_premul.get(i..i + 4)?);
        unpremultiply_rgba8_in_place(&mut px);
        Some(px)
    }

    /// Encode for display or export.
    pub fn encode(&self, encoding: ImageEncoding) -> SnapResult<EncodedImage> {
        EncodedImage::encode_rgba8(
            self.width,
            self.height,
            &self.to_straight_rgba8(),
            encoding,
        )
    }
}

/// Executes the passes of a [`RenderPlan`].
pub trait PassBackend {
    /// Allocate or resize surface `id`.
    fn ensure_surface(&mut self, id: SurfaceId, desc: &SurfaceDesc) -> SnapResult<()>;

    /// Run draw operations into a surface.
    fn exec_scene(&mut self, pass: &ScenePass, assets: &PreparedAssetStore) -> SnapResult<()>;

    /// Run a per-pixel effect.
    fn exec_offscreen(
        &mut self,
        pass: &OffscreenPass,
        assets: &PreparedAssetStore,
    ) -> SnapResult<()>;

    /// Blend surfaces together.
    fn exec_composite(
        &mut self,
        pass: &CompositePass,
        assets: &PreparedAssetStore,
    ) -> SnapResult<()>;

    /// Copy a surface out.
    fn readback_rgba8(&mut self, surface: SurfaceId, plan: &RenderPlan) -> SnapResult<RenderedImage>;
}

/// Run every pass of `plan` on `backend` and read back the final surface.
pub fn execute_plan<B: PassBackend + ?Sized>(
    backend: &mut B,
    plan: &RenderPlan,
    assets: &PreparedAssetStore,
) -> SnapResult<RenderedImage> {
    for (idx, desc) in plan.surfaces.iter().enumerate() {
        let id = SurfaceId(
            idx.try_into()
                .map_err(|_| SnapError::render("surface id overflow"))?,
        );
        backend.ensure_surface(id, desc)?;
    }

    for pass in &plan.passes {
        match pass {
            Pass::Scene(p) => backend.exec_scene(p, assets)?,
            Pass::Offscreen(p) => backend.exec_offscreen(p, assets)?,
            Pass::Composite(p) => backend.exec_composite(p, assets)?,
        }
    }

    backend.readback_rgba8(plan.final_surface, plan)
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
