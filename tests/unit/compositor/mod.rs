use super::*;

fn disc_png(w: u32, h: u32) -> Vec<u8> {
    let mut img = image::RgbaImage::new(w, h);
    let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);
    let r = w.min(h) as f32 / 3.0;
    for (x, y, px) in img.enumerate_pixels_mut() {
        let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
        if d <= r {
            *px = image::Rgba([220, 30, 60, 255]);
        }
    }
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

fn no_caption() -> CompositeOptions {
    CompositeOptions {
        caption: None,
        ..CompositeOptions::default()
    }
}

#[test]
fn default_options_use_sticker_constants() {
    let o = CompositeOptions::default();
    assert_eq!(o.target_size, 512);
    assert_eq!(o.initial_fill, 0.95);
    assert_eq!(o.final_fill, 0.90);
    assert_eq!(o.outline_px, Some(10));
    let s = o.shadow.unwrap();
    assert_eq!((s.offset, s.blur_radius), ((5, 5), 8));
    assert_eq!(o.caption.unwrap().style.font_size_px, 56.0);
}

#[test]
fn composited_output_is_square_png() {
    let c = Compositor::new(FontBook::empty(), no_caption());
    let png = c.composite_sticker(&disc_png(300, 180), "").unwrap();
    let out = decode_image(&png).unwrap();
    assert!(out.is_square());
    assert!(out.width() <= 512);
}

#[test]
fn outline_adds_white_border_pixels() {
    let src = decode_image(&disc_png(200, 200)).unwrap();
    let opts = CompositeOptions {
        shadow: None,
        ..no_caption()
    };
    let c = Compositor::new(FontBook::empty(), opts.clone());
    let out = c.composite_raster(&src, "", &opts).unwrap();
    let white = out
        .data()
        .chunks_exact(4)
        .filter(|px| px.iter().all(|&c| c >= 250))
        .count();
    assert!(white > 0);
}

#[test]
fn compositing_is_deterministic() {
    let c = Compositor::new(FontBook::empty(), no_caption());
    let src = disc_png(120, 90);
    assert_eq!(
        c.composite_sticker(&src, "").unwrap(),
        c.composite_sticker(&src, "").unwrap()
    );
}

#[test]
fn corrupt_bytes_are_compositing_failures() {
    let c = Compositor::new(FontBook::empty(), CompositeOptions::default());
    let err = c.composite_sticker(b"not an image", "x").unwrap_err();
    assert!(err.is_compositing_failure());
}

#[test]
fn every_stage_can_be_disabled() {
    let src = decode_image(&disc_png(30, 20)).unwrap();
    let opts = CompositeOptions {
        normalize: false,
        outline_px: None,
        shadow: None,
        caption: None,
        ..CompositeOptions::default()
    };
    let c = Compositor::new(FontBook::empty(), opts.clone());
    assert_eq!(c.composite_raster(&src, "ignored", &opts).unwrap(), src);
}
