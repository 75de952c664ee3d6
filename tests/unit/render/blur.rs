use super::*;

#[test]
fn zero_radius_returns_input() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    assert_eq!(blur_rgba8_premul(&src, 2, 1, 0, 1.0).unwrap(), src);
}

#[test]
fn flat_color_is_unchanged() {
    let src = [40u8, 80, 120, 200].repeat(6 * 5);
    assert_eq!(blur_rgba8_premul(&src, 6, 5, 3, 1.5).unwrap(), src);
}

#[test]
fn single_dot_spreads_and_keeps_energy() {
    let (w, h) = (7u32, 7u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((3 * w + 3) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 0, 0, 255]);

    let out = blur_rgba8_premul(&src, w, h, 2, 1.0).unwrap();
    assert!(out.chunks_exact(4).filter(|px| px[3] != 0).count() > 1);
    let total: u32 = out.chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!(total.abs_diff(255) <= 6);
}

#[test]
fn rejects_bad_input() {
    assert!(blur_rgba8_premul(&[0u8; 7], 1, 2, 1, 1.0).is_err());
    assert!(blur_rgba8_premul(&[0u8; 8], 1, 2, 1, 0.0).is_err());
}
