//! snapjoy is the capture and compositing core of a photobooth.
//!
//! A session takes a timed sequence of photos from a camera, lays them out as a collage and lets
//! the user decorate a single photo before exporting it.
//!
//! # Pipeline overview
//!
//! 1. **Capture**: a [`Booth`] drives the [`CaptureSequencer`] once per second (directly or via
//!    [`CountdownDriver`]). Each shot is a square, mirrored-for-selfies crop of the current
//!    [`VideoFrame`] written to the lowest empty slot of the [`CollageModel`].
//! 2. **Edit**: an [`EditorSession`] holds stickers, text, filter, frame and base transform and
//!    snapshots them into an immutable [`RenderSpec`].
//! 3. **Render**: `RenderSpec -> RenderPlan -> RenderedImage`. Every asset is resolved through an
//!    [`AssetSource`] before drawing starts; the CPU backend then runs the plan's passes.
//! 4. **Export**: encoded photos are handed to an [`ExportSink`].
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: the same spec and assets render byte-identical output.
//! - **No IO while drawing**: IO is front-loaded into a [`PreparedAssetStore`].
//! - **Premultiplied RGBA8** inside the renderer; straight alpha at the edges.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod booth;
mod capture;
mod collage;
mod compose;
mod editor;
mod export;
mod foundation;
mod render;

pub use assets::decode::{decode_image, parse_svg};
pub use assets::encoded::{DEFAULT_JPEG_QUALITY, EncodedImage, ImageEncoding};
pub use assets::source::{AssetSource, FsAssetSource, MemoryAssetSource, font_families};
pub use assets::store::{
    AssetId, PreparedAsset, PreparedAssetStore, PreparedImage, PreparedSvg, PreparedText,
    TextBrushRgba8, TextLayoutEngine, normalize_rel_path,
};
pub use assets::svg_raster::{rasterize_svg, svg_fit_size};
pub use booth::{Booth, BoothEvent};
pub use capture::camera::{Camera, VideoSource};
pub use capture::driver::{CancelHandle, CountdownDriver, CountdownOutcome};
pub use capture::frame::{FrameSource, VideoFrame, capture_frame, crop_square};
pub use capture::sequencer::{CaptureSequencer, RequestOutcome, SequencerState, TickOutcome};
pub use collage::config::{CollageConfig, CountdownSecs, FacingMode, SlotCount};
pub use collage::layout::{GridCell, GridLayout, layout_for};
pub use collage::model::{CaptureSlot, CollageModel};
pub use collage::sheet::{SheetOptions, export_collage_sheet, render_collage_sheet};
pub use compose::filter::{FilterChain, FilterFn, FilterPreset};
pub use compose::frame_style::{FrameGeometry, FrameGlow, FrameStyle};
pub use compose::plan::{
    CompositeOp, CompositePass, DrawOp, OffscreenPass, Pass, PassFx, RenderPlan, SceneAssets,
    ScenePass, SurfaceDesc, SurfaceId, base_transform, compile_render, element_transform,
};
pub use compose::spec::{
    ColorAdjustment, EMOJI_FONT_FAMILY, GeometricTransform, RenderSpec, StickerPlacement,
    StickerSource, TextPlacement,
};
pub use editor::catalog::{FONTS, FontChoice, STICKERS, StickerChoice, TEXT_COLORS};
pub use editor::session::{
    BRIGHTNESS_RANGE, CONTRAST_RANGE, DEFAULT_STICKER_SIZE, EditorFeatures, EditorSession,
    ElementKind, MAX_TEXT_CHARS, SATURATION_RANGE, TextStyle,
};
pub use editor::viewport::Viewport;
pub use export::{
    DirectorySink, ExportSink, MemorySink, collage_file_name, edited_file_name, save_edited,
    slot_file_name, timestamp_millis,
};
pub use foundation::core::{Affine, BezPath, Canvas, ElementId, Point, Rect, Rgba8, Vec2};
pub use foundation::error::{CameraError, SnapError, SnapResult};
pub use render::backend::{PassBackend, RenderedImage, execute_plan};
pub use render::cpu::CpuBackend;
pub use render::pipeline::{gather_assets, render, render_rgba};
