use super::*;

fn opaque_block(w: u32, h: u32) -> RasterImage {
    RasterImage::from_premul(w, h, [40u8, 80, 120, 255].repeat((w * h) as usize)).unwrap()
}

#[test]
fn canvas_grows_with_offset_and_blur() {
    let src = opaque_block(20, 10);
    let out = add_drop_shadow(&src, (5, 5), 8, 0.3).unwrap();
    assert_eq!((out.width(), out.height()), (20 + 16 + 5, 10 + 16 + 5));

    let out = add_drop_shadow(&src, (0, 0), 3, 0.3).unwrap();
    assert!(out.width() > 20 && out.height() > 10);

    let out = add_drop_shadow(&src, (-4, 0), 0, 0.3).unwrap();
    assert_eq!((out.width(), out.height()), (24, 10));
}

#[test]
fn zero_offset_zero_blur_keeps_size() {
    let src = opaque_block(6, 6);
    let out = add_drop_shadow(&src, (0, 0), 0, 0.5).unwrap();
    assert_eq!(out, src);
}

#[test]
fn subject_is_drawn_over_shadow() {
    let src = opaque_block(10, 10);
    let out = add_drop_shadow(&src, (5, 5), 4, 1.0).unwrap();
    // Subject sits at (blur, blur) for a positive offset.
    for y in 4..14 {
        for x in 4..14 {
            assert_eq!(out.pixel(x, y), [40, 80, 120, 255]);
        }
    }
}

#[test]
fn shadow_is_black_and_attenuated() {
    let src = opaque_block(10, 10);
    let out = add_drop_shadow(&src, (6, 6), 0, 0.5).unwrap();
    // Covered by the shadow only.
    assert_eq!(out.pixel(15, 15), [0, 0, 0, 128]);
    // Uncovered corner.
    assert_eq!(out.pixel(15, 0), [0, 0, 0, 0]);
}

#[test]
fn negative_offset_moves_subject_instead() {
    let src = opaque_block(4, 4);
    let out = add_drop_shadow(&src, (-3, -3), 0, 1.0).unwrap();
    assert_eq!(out.pixel(3, 3), [40, 80, 120, 255]);
    assert_eq!(out.pixel(0, 0), [0, 0, 0, 255]);
}

#[test]
fn invalid_opacity_is_rejected() {
    let src = opaque_block(2, 2);
    assert!(add_drop_shadow(&src, (1, 1), 1, 1.5).is_err());
    assert!(add_drop_shadow(&src, (1, 1), 1, f32::NAN).is_err());
}
