use crate::compositor::raster::RasterImage;
use crate::foundation::error::{ForgeError, ForgeResult};
use crate::foundation::math::mul_div255_u8;

pub type PremulRgba8 = [u8; 4];

/// Premultiplied source-over: `src + dst * (1 - src.a)`.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    match src[3] {
        0 => dst,
        255 => src,
        sa => {
            let keep = 255 - u16::from(sa);
            std::array::from_fn(|i| src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), keep)))
        }
    }
}

/// Composite a whole `src` buffer over an equally sized `dst`.
pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> ForgeResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ForgeError::compositing(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over(pixel_at(d, 0), pixel_at(s, 0));
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Draw `src` over `dst` with its top-left corner at `(x, y)`, clipping to `dst`.
pub fn draw_over(dst: &mut RasterImage, src: &RasterImage, x: i64, y: i64) {
    let Some(region) = Clip::new(dst, src.width(), src.height(), x, y) else {
        return;
    };
    let dst_w = dst.width() as usize;
    let src_w = src.width() as usize;
    let src_data = src.data();
    let dst_data = dst.data_mut();
    for row in 0..region.rows {
        for col in 0..region.cols {
            let si = ((region.src_y + row) * src_w + region.src_x + col) * 4;
            let di = ((region.dst_y + row) * dst_w + region.dst_x + col) * 4;
            let out = over(pixel_at(dst_data, di), pixel_at(src_data, si));
            dst_data[di..di + 4].copy_from_slice(&out);
        }
    }
}

/// Stamp a solid straight-RGB color through an 8-bit coverage mask placed at `(x, y)`.
pub fn fill_mask_over(
    dst: &mut RasterImage,
    mask: &[u8],
    mask_w: u32,
    mask_h: u32,
    x: i64,
    y: i64,
    rgb: [u8; 3],
) -> ForgeResult<()> {
    if mask.len() != (mask_w as usize) * (mask_h as usize) {
        return Err(ForgeError::compositing(
            "fill_mask_over expects mask matching width*height",
        ));
    }
    let Some(region) = Clip::new(dst, mask_w, mask_h, x, y) else {
        return Ok(());
    };
    let dst_w = dst.width() as usize;
    let mask_w = mask_w as usize;
    let dst_data = dst.data_mut();
    for row in 0..region.rows {
        for col in 0..region.cols {
            let a = mask[(region.src_y + row) * mask_w + region.src_x + col];
            if a == 0 {
                continue;
            }
            let ink = [
                mul_div255_u8(u16::from(rgb[0]), u16::from(a)),
                mul_div255_u8(u16::from(rgb[1]), u16::from(a)),
                mul_div255_u8(u16::from(rgb[2]), u16::from(a)),
                a,
            ];
            let di = ((region.dst_y + row) * dst_w + region.dst_x + col) * 4;
            let out = over(pixel_at(dst_data, di), ink);
            dst_data[di..di + 4].copy_from_slice(&out);
        }
    }
    Ok(())
}

fn pixel_at(data: &[u8], i: usize) -> PremulRgba8 {
    [data[i], data[i + 1], data[i + 2], data[i + 3]]
}

/// Overlap between a `w x h` source placed at `(x, y)` and the destination raster.
struct Clip {
    src_x: usize,
    src_y: usize,
    dst_x: usize,
    dst_y: usize,
    cols: usize,
    rows: usize,
}

impl Clip {
    fn new(dst: &RasterImage, w: u32, h: u32, x: i64, y: i64) -> Option<Self> {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + i64::from(w)).min(i64::from(dst.width()));
        let y1 = (y + i64::from(h)).min(i64::from(dst.height()));
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Self {
            src_x: (x0 - x) as usize,
            src_y: (y0 - y) as usize,
            dst_x: x0 as usize,
            dst_y: y0 as usize,
            cols: (x1 - x0) as usize,
            rows: (y1 - y0) as usize,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/blend.rs"]
mod tests;
