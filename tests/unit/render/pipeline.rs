use super::*;
use crate::assets::encoded::ImageEncoding;
use crate::assets::source::MemoryAssetSource;
use crate::compose::spec::{StickerPlacement, TextPlacement};
use crate::foundation::core::{Canvas, ElementId, Point};

fn png(w: u32, h: u32, rgba: [u8; 4]) -> EncodedImage {
    EncodedImage::encode_rgba8(w, h, &rgba.repeat((w * h) as usize), ImageEncoding::Png).unwrap()
}

fn small_spec() -> RenderSpec {
    RenderSpec {
        canvas: Canvas::square(32),
        output: ImageEncoding::Png,
        ..RenderSpec::new(png(16, 16, [0, 0, 255, 255]))
    }
}

fn sticker(source: StickerSource, size: f64) -> StickerPlacement {
    StickerPlacement {
        id: ElementId(1),
        source,
        position: Point::new(16.0, 16.0),
        size,
        rotation_deg: 0.0,
    }
}

const SQUARE_SVG: &[u8] = br##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
<rect width="10" height="10" fill="#00ff00"/>
</svg>"##;

#[test]
fn gather_resolves_image_and_svg_stickers() {
    let source = MemoryAssetSource::new()
        .with_file("dot.png", png(2, 2, [255, 0, 0, 255]).bytes().to_vec())
        .with_file("sq.svg", SQUARE_SVG.to_vec());
    let mut spec = small_spec();
    spec.stickers.push(sticker(StickerSource::Image("dot.png".into()), 8.0));
    spec.stickers.push(sticker(StickerSource::Svg("sq.svg".into()), 12.0));

    let (store, scene) = gather_assets(&spec, &source).unwrap();
    assert_eq!(store.len(), 3);
    assert_eq!(store.image(scene.base).unwrap().width, 16);
    assert_eq!(store.image(scene.stickers[0]).unwrap().width, 2);
    assert_eq!(store.image(scene.stickers[1]).unwrap().width, 12);
}

#[test]
fn any_missing_asset_fails_the_render() {
    let mut spec = small_spec();
    spec.stickers.push(sticker(StickerSource::Image("nope.png".into()), 8.0));
    assert!(matches!(
        render(&spec, &MemoryAssetSource::new()),
        Err(SnapError::Asset(_))
    ));

    let mut spec = small_spec();
    spec.texts.push(TextPlacement {
        id: ElementId(2),
        content: "hello".into(),
        position: Point::new(4.0, 4.0),
        font_family: "Impact".into(),
        size: 12.0,
        color: Rgba8::WHITE,
        rotation_deg: 0.0,
    });
    assert!(render(&spec, &MemoryAssetSource::new()).is_err());
}

#[test]
fn corrupt_base_fails_with_asset_error() {
    let mut spec = small_spec();
    let mut bytes = spec.base.bytes().to_vec();
    // Signature and header survive, pixel data does not.
    bytes.truncate(41);
    spec.base = EncodedImage::from_encoded_bytes(bytes).unwrap();
    assert!(matches!(
        render(&spec, &MemoryAssetSource::new()),
        Err(SnapError::Asset(_))
    ));
}

#[test]
fn plain_render_covers_canvas_with_base() {
    let img = render_rgba(&small_spec(), &MemoryAssetSource::new()).unwrap();
    assert_eq!((img.width, img.height), (32, 32));
    assert_eq!(img.pixel(16, 16), Some([0, 0, 255, 255]));
    assert_eq!(img.pixel(0, 0), Some([0, 0, 255, 255]));
}

#[test]
fn image_sticker_draws_over_base_centered() {
    let source = MemoryAssetSource::new()
        .with_file("dot.png", png(2, 2, [255, 0, 0, 255]).bytes().to_vec());
    let mut spec = small_spec();
    spec.stickers.push(sticker(StickerSource::Image("dot.png".into()), 8.0));

    let img = render_rgba(&spec, &source).unwrap();
    assert_eq!(img.pixel(16, 16), Some([255, 0, 0, 255]));
    assert_eq!(img.pixel(4, 4), Some([0, 0, 255, 255]));
}
