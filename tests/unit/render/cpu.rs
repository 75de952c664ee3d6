use std::sync::Arc;

use super::*;
use crate::assets::store::PreparedImage;
use crate::compose::filter::{FilterChain, FilterFn};
use crate::compose::plan::Pass;
use crate::foundation::core::{Canvas, Rect, Rgba8};
use crate::render::backend::execute_plan;

fn plan(side: u32, surfaces: usize, passes: Vec<Pass>) -> RenderPlan {
    RenderPlan {
        canvas: Canvas::square(side),
        surfaces: vec![
            SurfaceDesc {
                width: side,
                height: side,
            };
            surfaces
        ],
        passes,
        final_surface: SurfaceId(0),
    }
}

fn rect_path(x0: f64, y0: f64, x1: f64, y1: f64) -> BezPath {
    use kurbo::Shape;
    Rect::new(x0, y0, x1, y1).to_path(0.1)
}

#[test]
fn clear_then_fill_path() {
    let p = plan(
        8,
        1,
        vec![Pass::Scene(ScenePass {
            target: SurfaceId(0),
            ops: vec![DrawOp::FillPath {
                path: rect_path(0.0, 0.0, 4.0, 8.0),
                transform: Affine::IDENTITY,
                color: Rgba8::rgb(255, 0, 0),
            }],
            clear: Some(Rgba8::rgb(0, 0, 255)),
        })],
    );
    let img = execute_plan(&mut CpuBackend::new(), &p, &PreparedAssetStore::new()).unwrap();
    assert_eq!(img.pixel(1, 4), Some([255, 0, 0, 255]));
    assert_eq!(img.pixel(6, 4), Some([0, 0, 255, 255]));
}

#[test]
fn image_scaled_to_fill_surface() {
    let mut store = PreparedAssetStore::new();
    let green = store
        .insert(PreparedAsset::Image(PreparedImage {
            width: 2,
            height: 2,
            rgba8_premul: Arc::new([0, 255, 0, 255].repeat(4)),
        }))
        .unwrap();
    let p = plan(
        8,
        1,
        vec![Pass::Scene(ScenePass {
            target: SurfaceId(0),
            ops: vec![DrawOp::Image {
                asset: green,
                transform: Affine::scale(4.0),
                opacity: 1.0,
            }],
            clear: Some(Rgba8::TRANSPARENT),
        })],
    );
    let img = execute_plan(&mut CpuBackend::new(), &p, &store).unwrap();
    assert_eq!(img.pixel(4, 4), Some([0, 255, 0, 255]));
    assert_eq!(img.pixel(0, 7), Some([0, 255, 0, 255]));
}

#[test]
fn offscreen_filter_and_composite() {
    let p = plan(
        4,
        2,
        vec![
            Pass::Scene(ScenePass {
                target: SurfaceId(0),
                ops: Vec::new(),
                clear: Some(Rgba8::BLACK),
            }),
            Pass::Scene(ScenePass {
                target: SurfaceId(1),
                ops: Vec::new(),
                clear: Some(Rgba8::rgb(200, 100, 50)),
            }),
            Pass::Offscreen(OffscreenPass {
                input: SurfaceId(1),
                output: SurfaceId(1),
                fx: PassFx::ColorFilter(FilterChain::new(vec![FilterFn::Grayscale(1.0)])),
            }),
            Pass::Composite(CompositePass {
                target: SurfaceId(0),
                ops: vec![CompositeOp::Over {
                    src: SurfaceId(1),
                    opacity: 1.0,
                }],
            }),
        ],
    );
    let img = execute_plan(&mut CpuBackend::new(), &p, &PreparedAssetStore::new()).unwrap();
    let [r, g, b, a] = img.pixel(2, 2).unwrap();
    assert_eq!(a, 255);
    assert!(r.abs_diff(g) <= 1 && g.abs_diff(b) <= 1);
}

#[test]
fn unknown_surface_and_asset_fail() {
    let p = plan(
        4,
        1,
        vec![Pass::Composite(CompositePass {
            target: SurfaceId(0),
            ops: vec![CompositeOp::Over {
                src: SurfaceId(5),
                opacity: 1.0,
            }],
        })],
    );
    assert!(execute_plan(&mut CpuBackend::new(), &p, &PreparedAssetStore::new()).is_err());

    let p = plan(
        4,
        1,
        vec![Pass::Scene(ScenePass {
            target: SurfaceId(0),
            ops: vec![DrawOp::Image {
                asset: AssetId(0),
                transform: Affine::IDENTITY,
                opacity: 1.0,
            }],
            clear: None,
        })],
    );
    assert!(matches!(
        execute_plan(&mut CpuBackend::new(), &p, &PreparedAssetStore::new()),
        Err(SnapError::Render(_))
    ));
}

#[test]
fn rounded_mask_clears_corners_only() {
    let p = plan(
        20,
        1,
        vec![
            Pass::Scene(ScenePass {
                target: SurfaceId(0),
                ops: Vec::new(),
                clear: Some(Rgba8::WHITE),
            }),
            Pass::Offscreen(OffscreenPass {
                input: SurfaceId(0),
                output: SurfaceId(0),
                fx: PassFx::RoundedMask { radius: 8.0 },
            }),
        ],
    );
    let img = execute_plan(&mut CpuBackend::new(), &p, &PreparedAssetStore::new()).unwrap();
    assert_eq!(img.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(img.pixel(19, 19), Some([0, 0, 0, 0]));
    assert_eq!(img.pixel(10, 0), Some([255, 255, 255, 255]));
    assert_eq!(img.pixel(0, 10), Some([255, 255, 255, 255]));
    assert_eq!(img.pixel(10, 10), Some([255, 255, 255, 255]));
}

#[test]
fn zero_radius_mask_keeps_every_pixel() {
    let p = plan(
        4,
        1,
        vec![
            Pass::Scene(ScenePass {
                target: SurfaceId(0),
                ops: Vec::new(),
                clear: Some(Rgba8::rgb(10, 20, 30)),
            }),
            Pass::Offscreen(OffscreenPass {
                input: SurfaceId(0),
                output: SurfaceId(0),
                fx: PassFx::RoundedMask { radius: 0.0 },
            }),
        ],
    );
    let img = execute_plan(&mut CpuBackend::new(), &p, &PreparedAssetStore::new()).unwrap();
    assert!(img.rgba8_premul.chunks_exact(4).all(|px| px == [10, 20, 30, 255]));
}
