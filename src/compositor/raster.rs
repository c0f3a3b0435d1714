use crate::foundation::error::{ForgeError, ForgeResult};

/// Largest edge accepted for any working raster.
pub const MAX_DIM: u32 = 16_384;

/// In-memory RGBA8 raster with premultiplied alpha, row-major and tightly packed.
///
/// Owned by exactly one compositing run; never shared across pipeline steps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterImage {
    /// Fully transparent raster.
    pub fn new_transparent(width: u32, height: u32) -> ForgeResult<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; len],
        })
    }

    /// Wrap an already-premultiplied buffer.
    pub fn from_premul(width: u32, height: u32, data: Vec<u8>) -> ForgeResult<Self> {
        let len = byte_len(width, height)?;
        if data.len() != len {
            return Err(ForgeError::validation(
                "raster buffer must match width*height*4",
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build from straight (non-premultiplied) RGBA8.
    pub fn from_straight_rgba(width: u32, height: u32, mut data: Vec<u8>) -> ForgeResult<Self> {
        premultiply_in_place(&mut data);
        Self::from_premul(width, height, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Premultiplied pixel at `(x, y)`; out-of-range coordinates read as transparent.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0; 4];
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Alpha channel as a tightly packed 8-bit mask.
    pub fn alpha_mask(&self) -> Vec<u8> {
        self.data.chunks_exact(4).map(|px| px[3]).collect()
    }

    /// Count of pixels with any coverage.
    pub fn covered_pixels(&self) -> usize {
        self.data.chunks_exact(4).filter(|px| px[3] != 0).count()
    }

    pub fn to_straight_rgba(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u32::from(px[3]);
            if a == 0 {
                px[0] = 0;
                px[1] = 0;
                px[2] = 0;
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }
}

pub(crate) fn byte_len(width: u32, height: u32) -> ForgeResult<usize> {
    if width == 0 || height == 0 {
        return Err(ForgeError::validation("raster dimensions must be non-zero"));
    }
    if width > MAX_DIM || height > MAX_DIM {
        return Err(ForgeError::validation(format!(
            "raster size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| ForgeError::compositing("raster buffer size overflow"))
}

pub(crate) fn premultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/raster.rs"]
mod tests;
