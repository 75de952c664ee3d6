use crate::assets::store::{AssetId, PreparedAssetStore};
use crate::compose::filter::FilterChain;
use crate::compose::spec::RenderSpec;
use crate::foundation::core::{Affine, BezPath, Canvas, Rgba8, Vec2};
use crate::foundation::error::{SnapError, SnapResult};

#[derive(Clone, Debug)]
/// Backend-agnostic pass list for one render.
///
/// Surfaces are declared up front, passes run in order and `final_surface` is read back.
pub struct RenderPlan {
    /// Output size.
    pub canvas: Canvas,
    /// Surface declarations, indexed by [`SurfaceId`].
    pub surfaces: Vec<SurfaceDesc>,
    /// Passes in execution order.
    pub passes: Vec<Pass>,
    /// Surface holding the finished image.
    pub final_surface: SurfaceId,
}

#[derive(Clone, Debug)]
/// A single pass in a [`RenderPlan`].
pub enum Pass {
    /// Draw operations into a surface.
    Scene(ScenePass),
    /// Per-pixel effect from one surface into another.
    Offscreen(OffscreenPass),
    /// Blend surfaces onto a target.
    Composite(CompositePass),
}

#[derive(Clone, Debug)]
/// Draw operations into a surface.
pub struct ScenePass {
    /// Surface drawn into.
    pub target: SurfaceId,
    /// Operations in painter's order.
    pub ops: Vec<DrawOp>,
    /// Fill the surface with this color first; `None` keeps its content.
    pub clear: Option<Rgba8>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Identifier for a render surface declared in [`RenderPlan::surfaces`].
pub struct SurfaceId(pub u32);

#[derive(Clone, Debug, PartialEq, Eq)]
/// Surface declaration; every surface is premultiplied RGBA8.
pub struct SurfaceDesc {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

#[derive(Clone, Debug, PartialEq)]
/// Effect run by an [`OffscreenPass`].
pub enum PassFx {
    /// Color filter chain on the whole surface.
    ColorFilter(FilterChain),
    /// Separable gaussian blur.
    Blur {
        /// Kernel radius in pixels.
        radius_px: u32,
        /// Gaussian sigma.
        sigma: f32,
    },
    /// Clear everything outside a rounded rectangle covering the surface.
    RoundedMask {
        /// Corner radius in pixels.
        radius: f64,
    },
}

#[derive(Clone, Debug)]
/// Run a post-processing effect producing a new surface from an input surface.
pub struct OffscreenPass {
    /// Source surface.
    pub input: SurfaceId,
    /// Destination surface; may equal `input`.
    pub output: SurfaceId,
    /// Effect to run.
    pub fx: PassFx,
}

#[derive(Clone, Debug)]
/// Composite surfaces into a target surface.
pub struct CompositePass {
    /// Surface blended onto.
    pub target: SurfaceId,
    /// Blends in order.
    pub ops: Vec<CompositeOp>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// A compositing operation between surfaces.
pub enum CompositeOp {
    /// Source-over with extra opacity.
    Over {
        /// Surface blended.
        src: SurfaceId,
        /// Opacity multiplier.
        opacity: f32,
    },
}

#[derive(Clone, Debug)]
/// Draw operation emitted by the compiler.
pub enum DrawOp {
    /// Solid fill of a path under the non-zero rule.
    FillPath {
        /// Path in local space.
        path: BezPath,
        /// Local to surface transform.
        transform: Affine,
        /// Fill color.
        color: Rgba8,
    },
    /// Prepared image drawn at its natural size in local space.
    Image {
        /// Image asset.
        asset: AssetId,
        /// Local to surface transform.
        transform: Affine,
        /// Opacity multiplier.
        opacity: f32,
    },
    /// Prepared text drawn with its layout box at the local origin.
    Text {
        /// Text asset.
        asset: AssetId,
        /// Local to surface transform.
        transform: Affine,
    },
}

/// Assets of one spec, resolved by the gather phase.
#[derive(Clone, Debug)]
pub struct SceneAssets {
    /// Decoded base photo.
    pub base: AssetId,
    /// One asset per sticker, in spec order.
    pub stickers: Vec<AssetId>,
    /// One asset per text, in spec order.
    pub texts: Vec<AssetId>,
}

/// Transform mapping base photo pixels onto the canvas.
///
/// The middle square of the photo is scaled onto the canvas, then rotated and mirrored around
/// the canvas center. The scale does not depend on the rotation, so off-axis angles leave the
/// background visible in the corners instead of shrinking the photo.
pub fn base_transform(
    canvas: Canvas,
    image_size: (u32, u32),
    rotation_deg: f64,
    flip_horizontal: bool,
) -> Affine {
    let (iw, ih) = (f64::from(image_size.0), f64::from(image_size.1));
    let theta = rotation_deg.to_radians();
    let scale = f64::from(canvas.width.max(canvas.height)) / iw.min(ih);
    let flip = if flip_horizontal {
        Affine::FLIP_X
    } else {
        Affine::IDENTITY
    };

    Affine::translate(canvas.center().to_vec2())
        * Affine::rotate(theta)
        * flip
        * Affine::scale(scale)
        * Affine::translate(Vec2::new(-iw / 2.0, -ih / 2.0))
}

/// Transform placing a `size` box centered on `center`, rotated by `rotation_deg`.
pub fn element_transform(center: Vec2, rotation_deg: f64, size: (f64, f64), scale: f64) -> Affine {
    Affine::translate(center)
        * Affine::rotate(rotation_deg.to_radians())
        * Affine::scale(scale)
        * Affine::translate(Vec2::new(-size.0 / 2.0, -size.1 / 2.0))
}

/// Compile `spec` into passes against already gathered assets.
///
/// Surface 0 holds the background and receives the finished layer; surface 1 is the photo layer.
pub fn compile_render(
    spec: &RenderSpec,
    scene: &SceneAssets,
    assets: &PreparedAssetStore,
) -> SnapResult<RenderPlan> {
    let canvas = spec.canvas.validate()?;
    if scene.stickers.len() != spec.stickers.len() || scene.texts.len() != spec.texts.len() {
        return Err(SnapError::render(
            "gathered assets do not match the render spec",
        ));
    }

    let mut surfaces = Vec::<SurfaceDesc>::new();
    let mut new_surface = || -> SnapResult<SurfaceId> {
        let id = u32::try_from(surfaces.len())
            .map_err(|_| SnapError::render("surface id overflow"))?;
        surfaces.push(SurfaceDesc {
            width: canvas.width,
            height: canvas.height,
        });
        Ok(SurfaceId(id))
    };
    let out = new_surface()?;
    let layer = new_surface()?;
    let mut passes = Vec::<Pass>::new();

    passes.push(Pass::Scene(ScenePass {
        target: out,
        ops: Vec::new(),
        clear: Some(spec.background),
    }));

    let base = assets.image(scene.base)?;
    passes.push(Pass::Scene(ScenePass {
        target: layer,
        ops: vec![DrawOp::Image {
            asset: scene.base,
            transform: base_transform(
                canvas,
                (base.width, base.height),
                spec.transform.rotation_deg,
                spec.transform.flip_horizontal,
            ),
            opacity: 1.0,
        }],
        clear: Some(Rgba8::TRANSPARENT),
    }));

    let chain = spec.adjustment.filter_chain()?;
    if !chain.is_identity() {
        passes.push(Pass::Offscreen(OffscreenPass {
            input: layer,
            output: layer,
            fx: PassFx::ColorFilter(chain),
        }));
    }

    let mut overlay = Vec::<DrawOp>::with_capacity(spec.stickers.len() + spec.texts.len());
    for (placement, &asset) in spec.stickers.iter().zip(&scene.stickers) {
        overlay.push(sticker_op(placement, asset, assets)?);
    }
    for (placement, &asset) in spec.texts.iter().zip(&scene.texts) {
        let text = assets.text(asset)?;
        overlay.push(DrawOp::Text {
            asset,
            transform: element_transform(
                placement.position.to_vec2(),
                placement.rotation_deg,
                (text.width, text.height),
                1.0,
            ),
        });
    }

    if let Some(frame) = spec.frame.geometry(canvas) {
        let border = frame.border_path(canvas);
        if let Some(glow) = frame.glow {
            let halo = new_surface()?;
            let blurred = new_surface()?;
            passes.push(Pass::Scene(ScenePass {
                target: halo,
                ops: vec![DrawOp::FillPath {
                    path: border.clone(),
                    transform: Affine::IDENTITY,
                    color: glow.color,
                }],
                clear: Some(Rgba8::TRANSPARENT),
            }));
            passes.push(Pass::Offscreen(OffscreenPass {
                input: halo,
                output: blurred,
                fx: PassFx::Blur {
                    radius_px: glow.radius_px,
                    sigma: glow.radius_px as f32 / 2.0,
                },
            }));
            if !overlay.is_empty() {
                passes.push(Pass::Scene(ScenePass {
                    target: layer,
                    ops: std::mem::take(&mut overlay),
                    clear: None,
                }));
            }
            passes.push(Pass::Composite(CompositePass {
                target: layer,
                ops: vec![CompositeOp::Over {
                    src: blurred,
                    opacity: glow.opacity,
                }],
            }));
        }
        overlay.push(DrawOp::FillPath {
            path: border,
            transform: Affine::IDENTITY,
            color: frame.color,
        });

        passes.push(Pass::Scene(ScenePass {
            target: layer,
            ops: std::mem::take(&mut overlay),
            clear: None,
        }));
        if frame.radius > 0.0 {
            passes.push(Pass::Offscreen(OffscreenPass {
                input: layer,
                output: layer,
                fx: PassFx::RoundedMask {
                    radius: frame.radius,
                },
            }));
        }
    } else if !overlay.is_empty() {
        passes.push(Pass::Scene(ScenePass {
            target: layer,
            ops: overlay,
            clear: None,
        }));
    }

    passes.push(Pass::Composite(CompositePass {
        target: out,
        ops: vec![CompositeOp::Over {
            src: layer,
            opacity: 1.0,
        }],
    }));

    Ok(RenderPlan {
        canvas,
        surfaces,
        passes,
        final_surface: out,
    })
}

fn sticker_op(
    placement: &crate::compose::spec::StickerPlacement,
    asset: AssetId,
    assets: &PreparedAssetStore,
) -> SnapResult<DrawOp> {
    let center = placement.position.to_vec2();
    match assets.get(asset)? {
        crate::assets::store::PreparedAsset::Image(img) => {
            let (w, h) = (f64::from(img.width), f64::from(img.height));
            Ok(DrawOp::Image {
                asset,
                transform: element_transform(
                    center,
                    placement.rotation_deg,
                    (w, h),
                    placement.size / w.max(h),
                ),
                opacity: 1.0,
            })
        }
        crate::assets::store::PreparedAsset::Text(text) => Ok(DrawOp::Text {
            asset,
            transform: element_transform(
                center,
                placement.rotation_deg,
                (text.width, text.height),
                1.0,
            ),
        }),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/plan.rs"]
mod tests;
