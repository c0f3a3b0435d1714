use serde::{Deserialize, Serialize};

use crate::compositor::blend::fill_mask_over;
use crate::compositor::fonts::{FontBook, GlyphMask};
use crate::compositor::morphology::{Footprint, dilate_mask};
use crate::compositor::raster::RasterImage;
use crate::foundation::error::ForgeResult;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionPosition {
    Top,
    #[default]
    Bottom,
    Center,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionStyle {
    pub font_size_px: f32,
    /// Fitting never shrinks below this size; longer captions are clipped instead.
    pub min_font_size_px: f32,
    pub bottom_padding_px: u32,
    pub top_padding_px: u32,
    pub side_padding_px: u32,
    /// Half-width of the square black contour around each glyph.
    pub contour_radius_px: u32,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font_size_px: 56.0,
            min_font_size_px: 12.0,
            bottom_padding_px: 25,
            top_padding_px: 20,
            side_padding_px: 12,
            contour_radius_px: 5,
        }
    }
}

/// Draw `text` upper-cased in white over a thick black contour, centered horizontally.
///
/// Empty or whitespace-only text returns a pixel-identical copy of `image`.
pub fn render_caption(
    image: &RasterImage,
    text: &str,
    position: CaptionPosition,
    fonts: &FontBook,
    style: &CaptionStyle,
) -> ForgeResult<RasterImage> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(image.clone());
    }
    let caption = trimmed.to_uppercase();

    let glyph = fit_caption(&caption, image.width(), fonts, style)?;
    let r = style.contour_radius_px;

    let (w, h) = (i64::from(image.width()), i64::from(image.height()));
    let (gw, gh) = (i64::from(glyph.width), i64::from(glyph.height));
    let x = (w - gw) / 2;
    let y = match position {
        CaptionPosition::Bottom => h - gh - i64::from(style.bottom_padding_px),
        CaptionPosition::Top => i64::from(style.top_padding_px),
        CaptionPosition::Center => (h - gh) / 2,
    };

    let (contour, cw, ch) = contour_mask(&glyph, r)?;

    let mut out = image.clone();
    fill_mask_over(&mut out, &contour, cw, ch, x - i64::from(r), y - i64::from(r), [0, 0, 0])?;
    fill_mask_over(
        &mut out,
        &glyph.alpha,
        glyph.width,
        glyph.height,
        x,
        y,
        [255, 255, 255],
    )?;
    Ok(out)
}

/// Largest size in `[min, preferred]` whose contoured caption fits inside the side padding.
fn fit_caption(
    caption: &str,
    image_width: u32,
    fonts: &FontBook,
    style: &CaptionStyle,
) -> ForgeResult<GlyphMask> {
    let min = style.min_font_size_px.max(1.0);
    let available = image_width
        .saturating_sub(2 * style.side_padding_px)
        .saturating_sub(2 * style.contour_radius_px) as f32;

    let mut size = style.font_size_px.max(min);
    loop {
        let glyph = fonts.rasterize_line(caption, size)?;
        let width = glyph.width as f32;
        if width <= available || size <= min {
            return Ok(glyph);
        }
        let shrunk = (size * available / width).floor();
        size = shrunk.min(size - 1.0).max(min);
    }
}

/// Glyph coverage padded by `radius` on every side and dilated with a square footprint.
fn contour_mask(glyph: &GlyphMask, radius: u32) -> ForgeResult<(Vec<u8>, u32, u32)> {
    let cw = glyph.width + 2 * radius;
    let ch = glyph.height + 2 * radius;
    let mut padded = vec![0u8; (cw as usize) * (ch as usize)];
    let (gw, r) = (glyph.width as usize, radius as usize);
    for (row, src) in glyph.alpha.chunks_exact(gw.max(1)).enumerate() {
        let start = (row + r) * cw as usize + r;
        padded[start..start + gw].copy_from_slice(src);
    }
    let dilated = dilate_mask(&padded, cw, ch, radius, Footprint::Square)?;
    Ok((dilated, cw, ch))
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/caption.rs"]
mod tests;
