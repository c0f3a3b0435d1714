use super::*;

fn gradient(w: u32, h: u32) -> RasterImage {
    let mut data = Vec::new();
    for y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&[(x * 3) as u8, (y * 5) as u8, 90, 255]);
        }
    }
    RasterImage::from_straight_rgba(w, h, data).unwrap()
}

#[test]
fn empty_caption_is_identity_for_every_position() {
    let img = gradient(40, 30);
    let fonts = FontBook::empty();
    for pos in [
        CaptionPosition::Top,
        CaptionPosition::Bottom,
        CaptionPosition::Center,
    ] {
        for text in ["", "   ", "\t\n"] {
            let out = render_caption(&img, text, pos, &fonts, &CaptionStyle::default()).unwrap();
            assert_eq!(out, img);
        }
    }
}

#[test]
fn missing_fonts_surface_as_font_error() {
    let img = gradient(64, 64);
    let err = render_caption(
        &img,
        "hi",
        CaptionPosition::Bottom,
        &FontBook::empty(),
        &CaptionStyle::default(),
    )
    .unwrap_err();
    assert!(err.is_compositing_failure());
}

#[test]
fn contour_mask_pads_and_dilates() {
    let glyph = GlyphMask {
        width: 1,
        height: 1,
        alpha: vec![255],
    };
    let (mask, w, h) = contour_mask(&glyph, 2).unwrap();
    assert_eq!((w, h), (5, 5));
    assert!(mask.iter().all(|&a| a == 255));
}

#[test]
fn caption_draws_white_core_and_black_contour() {
    let fonts = FontBook::system();
    if !fonts.has_fonts() {
        return;
    }
    let img = RasterImage::new_transparent(512, 512).unwrap();
    let out = render_caption(
        &img,
        "i'm dead",
        CaptionPosition::Bottom,
        &fonts,
        &CaptionStyle::default(),
    )
    .unwrap();
    assert_eq!((out.width(), out.height()), (512, 512));

    let mut white = 0;
    let mut black = 0;
    for px in out.data().chunks_exact(4) {
        if px[3] == 255 && px[0] == 255 {
            white += 1;
        }
        if px[3] == 255 && px[0] == 0 {
            black += 1;
        }
    }
    assert!(white > 0);
    assert!(black > 0);

    // Bottom anchoring keeps the upper half untouched.
    assert!(out.data()[..512 * 200 * 4].iter().all(|&b| b == 0));
}

#[test]
fn long_captions_shrink_to_fit() {
    let fonts = FontBook::system();
    if !fonts.has_fonts() {
        return;
    }
    let style = CaptionStyle::default();
    let glyph = fit_caption("THIS CAPTION IS FAR TOO LONG", 200, &fonts, &style).unwrap();
    let available = 200 - 2 * style.side_padding_px - 2 * style.contour_radius_px;
    let at_min = fonts
        .rasterize_line("THIS CAPTION IS FAR TOO LONG", style.min_font_size_px)
        .unwrap();
    assert!(glyph.width <= available || glyph.width == at_min.width);
}
