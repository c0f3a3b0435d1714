use super::*;

fn opaque(w: u32, h: u32) -> RasterImage {
    RasterImage::from_straight_rgba(w, h, [200, 40, 10, 255].repeat((w * h) as usize)).unwrap()
}

#[test]
fn output_is_square_for_any_aspect() {
    for (w, h) in [(300, 100), (100, 300), (64, 64), (1, 40), (900, 13)] {
        for fill in [0.1f32, 0.5, 0.9, 0.95, 1.0] {
            for target in [1u32, 64, 512] {
                let out = normalize_to_square(&opaque(w, h), target, fill).unwrap();
                assert!(out.is_square(), "{w}x{h} fill={fill} target={target}");
                assert!(out.width() <= target);
            }
        }
    }
}

#[test]
fn small_sources_are_not_upscaled_to_target() {
    let out = normalize_to_square(&opaque(50, 20), 512, 0.5).unwrap();
    assert_eq!(out.width(), 100);
}

#[test]
fn subject_is_centered_and_letterboxed() {
    let out = normalize_to_square(&opaque(200, 100), 100, 1.0).unwrap();
    assert_eq!(out.width(), 100);
    // Scaled to 100x50, placed at y=25.
    assert_eq!(out.pixel(50, 10)[3], 0);
    assert_eq!(out.pixel(50, 90)[3], 0);
    assert!(out.pixel(50, 50)[3] >= 250);
    assert!(out.pixel(0, 30)[3] >= 250);
}

#[test]
fn premultiplied_invariant_holds_after_resize() {
    let mut data = Vec::new();
    for i in 0..(40 * 40) {
        let a = if i % 3 == 0 { 0 } else { 255 };
        data.extend_from_slice(&[255, 255, 255, a]);
    }
    let img = RasterImage::from_straight_rgba(40, 40, data).unwrap();
    let out = normalize_to_square(&img, 17, 0.9).unwrap();
    for px in out.data().chunks_exact(4) {
        assert!(px[0] <= px[3] && px[1] <= px[3] && px[2] <= px[3]);
    }
}

#[test]
fn rejects_bad_fill_and_target() {
    let img = opaque(4, 4);
    assert!(normalize_to_square(&img, 64, 0.0).is_err());
    assert!(normalize_to_square(&img, 64, 1.5).is_err());
    assert!(normalize_to_square(&img, 64, f32::NAN).is_err());
    assert!(normalize_to_square(&img, 0, 0.5).is_err());
}
