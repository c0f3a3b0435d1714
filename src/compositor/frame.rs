use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgba};

use crate::compositor::blend::draw_over;
use crate::compositor::raster::RasterImage;
use crate::foundation::error::{ForgeError, ForgeResult};

/// Center `image` on a transparent square canvas with its longer edge at `fill_ratio` of it.
///
/// The canvas edge is `min(target_size, floor(max_dim / fill_ratio))`, so small sources are
/// never blown up past their native resolution. Letterboxing is transparent; nothing is cropped.
pub fn normalize_to_square(
    image: &RasterImage,
    target_size: u32,
    fill_ratio: f32,
) -> ForgeResult<RasterImage> {
    if !fill_ratio.is_finite() || fill_ratio <= 0.0 || fill_ratio > 1.0 {
        return Err(ForgeError::validation("fill ratio must be within (0, 1]"));
    }
    if target_size == 0 {
        return Err(ForgeError::validation("target size must be > 0"));
    }

    let (w, h) = (image.width(), image.height());
    let max_dim = w.max(h);
    if max_dim == 0 {
        return Err(ForgeError::compositing("cannot frame an empty raster"));
    }

    let natural = (f64::from(max_dim) / f64::from(fill_ratio)).floor() as u64;
    let canvas = natural.clamp(1, u64::from(target_size)) as u32;

    let scale = f64::from(canvas) * f64::from(fill_ratio) / f64::from(max_dim);
    let new_w = ((f64::from(w) * scale).floor() as u32).clamp(1, canvas);
    let new_h = ((f64::from(h) * scale).floor() as u32).clamp(1, canvas);

    let scaled = resize_premul(image, new_w, new_h)?;

    let mut out = RasterImage::new_transparent(canvas, canvas)?;
    let x = i64::from((canvas - new_w) / 2);
    let y = i64::from((canvas - new_h) / 2);
    draw_over(&mut out, &scaled, x, y);
    Ok(out)
}

/// Lanczos resample directly on premultiplied samples; ringing is clamped back to `rgb <= a`.
fn resize_premul(image: &RasterImage, width: u32, height: u32) -> ForgeResult<RasterImage> {
    if image.width() == width && image.height() == height {
        return Ok(image.clone());
    }
    let buf: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(image.width(), image.height(), image.data().to_vec())
            .ok_or_else(|| ForgeError::compositing("raster does not match its dimensions"))?;
    let mut data = imageops::resize(&buf, width, height, FilterType::Lanczos3).into_raw();
    for px in data.chunks_exact_mut(4) {
        let a = px[3];
        px[0] = px[0].min(a);
        px[1] = px[1].min(a);
        px[2] = px[2].min(a);
    }
    RasterImage::from_premul(width, height, data)
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/frame.rs"]
mod tests;
