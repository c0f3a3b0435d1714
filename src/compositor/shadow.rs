use crate::compositor::blend::draw_over;
use crate::compositor::blur::blur_mask;
use crate::compositor::raster::RasterImage;
use crate::foundation::error::{ForgeError, ForgeResult};
use crate::foundation::math::scale_u8;

/// Drop a soft black shadow behind the subject.
///
/// The canvas grows by `2 * blur_radius + |offset|` on each axis so neither the offset nor the
/// blur tail is clipped. The source is drawn last, at its un-offset position.
pub fn add_drop_shadow(
    image: &RasterImage,
    offset: (i32, i32),
    blur_radius: u32,
    opacity: f32,
) -> ForgeResult<RasterImage> {
    if !opacity.is_finite() || !(0.0..=1.0).contains(&opacity) {
        return Err(ForgeError::validation("shadow opacity must be within [0, 1]"));
    }

    let (dx, dy) = offset;
    let (w, h) = (image.width(), image.height());
    let grow = |len: u32, d: i32| -> ForgeResult<u32> {
        blur_radius
            .checked_mul(2)
            .and_then(|b| b.checked_add(d.unsigned_abs()))
            .and_then(|g| g.checked_add(len))
            .ok_or_else(|| ForgeError::compositing("shadow canvas size overflow"))
    };
    let out_w = grow(w, dx)?;
    let out_h = grow(h, dy)?;

    let pad = i64::from(blur_radius);
    let subject_x = pad + i64::from((-dx).max(0));
    let subject_y = pad + i64::from((-dy).max(0));
    let shadow_x = subject_x + i64::from(dx);
    let shadow_y = subject_y + i64::from(dy);

    let mut mask = vec![0u8; (out_w as usize) * (out_h as usize)];
    let alpha = image.alpha_mask();
    for row in 0..h as usize {
        let dst_start = (shadow_y as usize + row) * out_w as usize + shadow_x as usize;
        mask[dst_start..dst_start + w as usize]
            .copy_from_slice(&alpha[row * w as usize..(row + 1) * w as usize]);
    }

    let sigma = (blur_radius as f32 / 2.0).max(0.5);
    let blurred = blur_mask(&mask, out_w, out_h, blur_radius, sigma)?;

    let mut out = RasterImage::new_transparent(out_w, out_h)?;
    for (px, &a) in out.data_mut().chunks_exact_mut(4).zip(&blurred) {
        px[3] = scale_u8(a, opacity);
    }

    draw_over(&mut out, image, subject_x, subject_y);
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/shadow.rs"]
mod tests;
