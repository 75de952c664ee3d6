use super::*;

#[test]
fn family_stack_is_split_and_unquoted() {
    let fams: Vec<_> = font_families("'Comic Sans MS', cursive ,").collect();
    assert_eq!(fams, vec!["Comic Sans MS", "cursive"]);
}

#[test]
fn memory_source_resolves_first_known_family() {
    let src = MemoryAssetSource::new()
        .with_font("serif", vec![1])
        .with_font("Georgia", vec![2]);
    assert_eq!(src.load_font("Georgia, serif").unwrap(), vec![2]);
    assert_eq!(src.load_font("Times New Roman, serif").unwrap(), vec![1]);
    assert!(src.load_font("Impact").is_err());
}

#[test]
fn memory_source_falls_back_when_configured() {
    let src = MemoryAssetSource::new().with_fallback_font(vec![9]);
    assert_eq!(src.load_font("Impact, sans-serif").unwrap(), vec![9]);
}

#[test]
fn memory_source_files_by_key() {
    let src = MemoryAssetSource::new().with_file("heart.png", vec![1, 2, 3]);
    assert_eq!(src.load_bytes("heart.png").unwrap(), vec![1, 2, 3]);
    assert!(matches!(
        src.load_bytes("star.png"),
        Err(SnapError::Asset(_))
    ));
}

#[test]
fn fs_source_reads_below_root_and_rejects_traversal() {
    let dir = std::env::temp_dir().join(format!("snapjoy-fs-source-{}", std::process::id()));
    std::fs::create_dir_all(dir.join("stickers")).unwrap();
    std::fs::write(dir.join("stickers/a.bin"), [7u8, 8]).unwrap();
    std::fs::write(dir.join("font.ttf"), [5u8]).unwrap();

    let src = FsAssetSource::new(&dir).with_font("Arial", dir.join("font.ttf"));
    assert_eq!(src.load_bytes("stickers/a.bin").unwrap(), vec![7, 8]);
    assert!(src.load_bytes("../a.bin").is_err());
    assert!(src.load_bytes("stickers/missing.bin").is_err());
    assert_eq!(src.load_font("Arial, sans-serif").unwrap(), vec![5]);
    assert!(src.load_font("Georgia").is_err());

    std::fs::remove_dir_all(&dir).unwrap();
}
