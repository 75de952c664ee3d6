use super::*;
use crate::assets::source::MemoryAssetSource;

fn png(side: u32, rgba: [u8; 4]) -> EncodedImage {
    EncodedImage::encode_rgba8(
        side,
        side,
        &rgba.repeat((side * side) as usize),
        ImageEncoding::Png,
    )
    .unwrap()
}

fn session(canvas: u32) -> EditorSession {
    let mut s = EditorSession::with_options(
        png(8, [255, 0, 0, 255]),
        Canvas::square(canvas),
        EditorFeatures::default(),
    );
    s.set_output(ImageEncoding::Png);
    s
}

fn heart() -> StickerSource {
    StickerSource::Emoji("❤️".into())
}

#[test]
fn moved_sticker_lands_in_render_spec() {
    let mut s = EditorSession::new(png(8, [255, 0, 0, 255]));
    let id = s.add_sticker(heart()).unwrap();
    assert!(s.move_element(id, 120.0, 80.0));

    let spec = s.build_render_spec();
    assert_eq!(spec.stickers.len(), 1);
    assert_eq!(spec.stickers[0].position, Point::new(120.0, 80.0));
    assert_eq!(spec.stickers[0].size, DEFAULT_STICKER_SIZE);
    assert_eq!(spec.canvas, Canvas::EXPORT);
}

#[test]
fn new_elements_start_at_canvas_center_with_unique_ids() {
    let mut s = session(100);
    let a = s.add_sticker(heart()).unwrap();
    let b = s.add_text("hi", TextStyle::default()).unwrap();
    assert_ne!(a, b);
    assert_eq!(s.stickers()[0].position, Point::new(50.0, 50.0));
    assert_eq!(s.texts()[0].position, Point::new(50.0, 50.0));
    assert_eq!(s.texts()[0].font_family, "Arial, sans-serif");
    assert_eq!(s.texts()[0].color, Rgba8::WHITE);
    assert_eq!(s.element_kind(a), Some(ElementKind::Sticker));
    assert_eq!(s.element_kind(b), Some(ElementKind::Text));
}

#[test]
fn unknown_ids_are_ignored() {
    let mut s = session(100);
    s.add_sticker(heart()).unwrap();
    let before = s.build_render_spec();

    let ghost = ElementId(999);
    assert!(!s.move_element(ghost, 1.0, 1.0));
    assert!(!s.rotate_element(ghost, 45.0));
    assert!(!s.remove_element(ghost));
    assert!(!s.update_text(ghost, "x").unwrap());
    assert!(!s.begin_drag(ghost));
    assert_eq!(s.build_render_spec(), before);
}

#[test]
fn text_is_validated_and_capped() {
    let mut s = session(100);
    assert!(s.add_text("   ", TextStyle::default()).is_err());
    assert!(s.add_text("", TextStyle::default()).is_err());

    let long = "x".repeat(80);
    let id = s.add_text(&long, TextStyle::default()).unwrap();
    assert_eq!(s.texts()[0].content.chars().count(), MAX_TEXT_CHARS);

    assert!(s.update_text(id, "hello").unwrap());
    assert_eq!(s.texts()[0].content, "hello");
    assert!(s.update_text(id, " ").is_err());
    assert_eq!(s.texts()[0].content, "hello");
}

#[test]
fn remove_and_rotate_elements() {
    let mut s = session(100);
    let a = s.add_sticker(heart()).unwrap();
    let b = s.add_text("hey", TextStyle::default()).unwrap();
    assert!(s.rotate_element(b, 30.0));
    assert_eq!(s.texts()[0].rotation_deg, 30.0);

    assert!(s.remove_element(a));
    assert!(s.stickers().is_empty());
    assert_eq!(s.texts().len(), 1);
}

#[test]
fn drag_overwrites_position_until_released() {
    let mut s = session(100);
    let id = s.add_sticker(heart()).unwrap();
    assert!(!s.drag_to(Point::new(5.0, 5.0)));

    assert!(s.begin_drag(id));
    assert!(s.drag_to(Point::new(10.0, 20.0)));
    assert!(s.drag_to(Point::new(30.0, 40.0)));
    assert_eq!(s.stickers()[0].position, Point::new(30.0, 40.0));

    s.end_drag();
    assert_eq!(s.dragging(), None);
    assert!(!s.drag_to(Point::new(0.0, 0.0)));
    assert_eq!(s.stickers()[0].position, Point::new(30.0, 40.0));
}

#[test]
fn adjustments_are_clamped() {
    let mut s = session(100);
    s.set_adjustment(10.0, 500.0, 250.0).unwrap();
    let adj = s.adjustment();
    assert_eq!(
        (adj.brightness, adj.contrast, adj.saturation),
        (50.0, 150.0, 200.0)
    );
    s.set_adjustment(120.0, 90.0, -5.0).unwrap();
    assert_eq!(s.adjustment().saturation, 0.0);
    assert!(s.set_adjustment(f32::NAN, 100.0, 100.0).is_err());
}

#[test]
fn filters_accept_presets_and_expressions() {
    let mut s = session(100);
    s.set_filter("vintage").unwrap();
    assert_eq!(s.adjustment().filter, "Vintage");
    s.set_filter("none").unwrap();
    assert_eq!(s.adjustment().filter, "Original");
    s.set_filter("sepia(50%) hue-rotate(30deg)").unwrap();
    assert_eq!(s.adjustment().filter, "sepia(50%) hue-rotate(30deg)");
    assert!(s.set_filter("sparkle(3)").is_err());
    assert_eq!(s.adjustment().filter, "sepia(50%) hue-rotate(30deg)");
}

#[test]
fn frames_and_rotation() {
    let mut s = session(100);
    s.set_frame("Polaroid").unwrap();
    assert_eq!(s.frame(), FrameStyle::Polaroid);
    assert!(s.set_frame("Sparkly").is_err());

    s.rotate_left();
    assert_eq!(s.transform().rotation_deg, 270.0);
    s.rotate_right();
    s.rotate_right();
    assert_eq!(s.transform().rotation_deg, 90.0);
    s.set_rotation(-450.0).unwrap();
    assert_eq!(s.transform().rotation_deg, 270.0);
    assert!(s.set_rotation(f64::INFINITY).is_err());

    s.toggle_flip();
    assert!(s.build_render_spec().transform.flip_horizontal);
}

#[test]
fn disabled_features_are_refused() {
    let features = EditorFeatures {
        stickers: false,
        frames: false,
        ..EditorFeatures::default()
    };
    let mut s = EditorSession::with_options(png(8, [0, 0, 0, 255]), Canvas::square(64), features);
    assert!(matches!(
        s.add_sticker(heart()),
        Err(SnapError::Validation(_))
    ));
    assert!(s.set_frame("Gold").is_err());
    assert!(s.set_filter("Warm").is_ok());
    assert!(s.add_text("ok", TextStyle::default()).is_ok());
}

#[test]
fn preview_reflects_changes() {
    let mut s = session(384);
    let assets = MemoryAssetSource::new();
    assert_eq!(s.render_preview(&assets).unwrap().pixel(2, 2), Some([255, 0, 0, 255]));
    // Cached raster is returned when nothing changed.
    assert_eq!(s.render_preview(&assets).unwrap().width, 384);

    s.set_frame("Black").unwrap();
    assert_eq!(s.render_preview(&assets).unwrap().pixel(2, 2), Some([0, 0, 0, 255]));
    assert_eq!(
        s.render_preview(&assets).unwrap().pixel(192, 192),
        Some([255, 0, 0, 255])
    );
}

#[test]
fn commit_flattens_and_resets() {
    let mut s = session(64);
    let assets = MemoryAssetSource::new();
    s.set_frame("White").unwrap();
    s.set_adjustment(120.0, 100.0, 100.0).unwrap();
    s.rotate_right();
    s.add_text("hey", TextStyle::default()).unwrap();
    s.remove_element(ElementId(1));

    let out = s.commit(&assets).unwrap();
    assert_eq!((out.width(), out.height()), (64, 64));
    assert_eq!(s.base(), &out);
    assert_eq!(s.frame(), FrameStyle::None);
    assert_eq!(s.adjustment(), &ColorAdjustment::default());
    assert_eq!(s.transform(), GeometricTransform::default());
    assert!(s.stickers().is_empty() && s.texts().is_empty());
}

#[test]
fn corrupt_base_fails_commit_and_keeps_state() {
    let base = png(8, [255, 0, 0, 255]);
    let mut bytes = base.bytes().to_vec();
    bytes.truncate(41);
    let mut s = EditorSession::with_options(
        EncodedImage::from_encoded_bytes(bytes).unwrap(),
        Canvas::square(32),
        EditorFeatures::default(),
    );
    s.set_frame("Gold").unwrap();
    assert!(s.commit(&MemoryAssetSource::new()).is_err());
    assert_eq!(s.frame(), FrameStyle::Gold);
}
