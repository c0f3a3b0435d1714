use super::*;

#[test]
fn blur_radius_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6];
    let out = blur_mask(&src, 3, 2, 0, 1.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_constant_mask_is_identity() {
    let (w, h) = (4u32, 3u32);
    let src = vec![77u8; (w * h) as usize];
    let out = blur_mask(&src, w, h, 3, 2.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_spreads_energy_from_single_sample() {
    let (w, h) = (9u32, 9u32);
    let mut src = vec![0u8; (w * h) as usize];
    src[(4 * w + 4) as usize] = 255;

    let out = blur_mask(&src, w, h, 3, 1.5).unwrap();

    let nonzero = out.iter().filter(|&&a| a != 0).count();
    assert!(nonzero > 1);
    assert!(out[(4 * w + 4) as usize] < 255);

    let sum: u32 = out.iter().map(|&a| u32::from(a)).sum();
    assert!((sum as i32 - 255).abs() <= 16);
}

#[test]
fn blur_rejects_mismatched_buffer() {
    assert!(blur_mask(&[0u8; 5], 3, 2, 1, 1.0).is_err());
}

#[test]
fn blur_rejects_bad_sigma() {
    assert!(blur_mask(&[0u8; 4], 2, 2, 1, 0.0).is_err());
}
