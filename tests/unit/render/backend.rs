use super::*;
use crate::compose::plan::CompositeOp;
use crate::foundation::core::{Canvas, Rgba8};

#[derive(Default)]
struct Recorder {
    calls: Vec<String>,
}

impl PassBackend for Recorder {
    fn ensure_surface(&mut self, id: SurfaceId, _desc: &SurfaceDesc) -> SnapResult<()> {
        self.calls.push(format!("ensure {}", id.0));
        Ok(())
    }

    fn exec_scene(&mut self, pass: &ScenePass, _assets: &PreparedAssetStore) -> SnapResult<()> {
        self.calls.push(format!("scene {}", pass.target.0));
        Ok(())
    }

    fn exec_offscreen(
        &mut self,
        pass: &OffscreenPass,
        _assets: &PreparedAssetStore,
    ) -> SnapResult<()> {
        self.calls.push(format!("offscreen {}", pass.output.0));
        Ok(())
    }

    fn exec_composite(
        &mut self,
        pass: &CompositePass,
        _assets: &PreparedAssetStore,
    ) -> SnapResult<()> {
        self.calls.push(format!("composite {}", pass.target.0));
        Ok(())
    }

    fn readback_rgba8(&mut self, surface: SurfaceId, plan: &RenderPlan) -> SnapResult<RenderedImage> {
        self.calls.push(format!("readback {}", surface.0));
        Ok(RenderedImage {
            width: plan.canvas.width,
            height: plan.canvas.height,
            rgba8_premul: vec![0; plan.canvas.rgba8_len()],
        })
    }
}

#[test]
fn execute_plan_runs_passes_in_order() {
    let desc = SurfaceDesc {
        width: 2,
        height: 2,
    };
    let plan = RenderPlan {
        canvas: Canvas::square(2),
        surfaces: vec![desc.clone(), desc],
        passes: vec![
            Pass::Scene(ScenePass {
                target: SurfaceId(1),
                ops: Vec::new(),
                clear: Some(Rgba8::TRANSPARENT),
            }),
            Pass::Composite(CompositePass {
                target: SurfaceId(0),
                ops: vec![CompositeOp::Over {
                    src: SurfaceId(1),
                    opacity: 1.0,
                }],
            }),
        ],
        final_surface: SurfaceId(0),
    };

    let mut rec = Recorder::default();
    let img = execute_plan(&mut rec, &plan, &PreparedAssetStore::new()).unwrap();
    assert_eq!((img.width, img.height), (2, 2));
    assert_eq!(
        rec.calls,
        ["ensure 0", "ensure 1", "scene 1", "composite 0", "readback 0"]
    );
}

#[test]
fn rendered_image_unpremultiplies_pixels() {
    let img = RenderedImage {
        width: 2,
        height: 1,
        rgba8_premul: vec![255, 0, 0, 255, 64, 0, 0, 128],
    };
    assert_eq!(img.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(img.pixel(1, 0).map(|p| p[3]), Some(128));
    assert!(img.pixel(1, 0).unwrap()[0].abs_diff(128) <= 1);
    assert_eq!(img.pixel(2, 0), None);

    let png = img.encode(ImageEncoding::Png).unwrap();
    assert_eq!((png.width(), png.height()), (2, 1));
}
