use super::*;

fn photo() -> EncodedImage {
    EncodedImage::encode_rgba8(2, 2, &[9u8; 16], ImageEncoding::Png).unwrap()
}

#[test]
fn suggested_names_follow_booth_convention() {
    let jpeg = ImageEncoding::default();
    assert_eq!(slot_file_name(2, 1700, jpeg), "snapjoy-2-1700.jpg");
    assert_eq!(edited_file_name(1700, jpeg), "snapjoy-edited-1700.jpg");
    assert_eq!(
        collage_file_name(5, ImageEncoding::Png),
        "snapjoy-collage-5.png"
    );
    assert!(timestamp_millis() > 0);
}

#[test]
fn memory_sink_keeps_order() {
    let mut sink = MemorySink::new();
    sink.save(&photo(), "a.png");
    sink.save(&photo(), "b.png");
    let names: Vec<_> = sink.saved.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["a.png", "b.png"]);
}

#[test]
fn directory_sink_writes_and_swallows_failures() {
    let dir = std::env::temp_dir().join(format!("snapjoy-export-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let mut sink = DirectorySink::new(&dir);

    sink.save(&photo(), "one.png");
    assert_eq!(std::fs::read(dir.join("one.png")).unwrap(), photo().bytes());

    sink.save(&photo(), "../escape.png");
    assert!(!dir.join("../escape.png").exists());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn edited_photos_use_edited_name() {
    let mut sink = MemorySink::new();
    save_edited(&mut sink, &photo(), 42);
    assert_eq!(sink.saved[0].0, "snapjoy-edited-42.png");
}
