use std::io::Cursor;

use anyhow::Context;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::compositor::raster::RasterImage;
use crate::foundation::error::{ForgeError, ForgeResult};

pub fn decode_image(bytes: &[u8]) -> ForgeResult<RasterImage> {
    if bytes.is_empty() {
        return Err(ForgeError::decode("empty image buffer"));
    }
    let dyn_img =
        image::load_from_memory(bytes).map_err(|e| ForgeError::decode(format!("{e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    RasterImage::from_straight_rgba(width, height, rgba.into_raw())
}

pub fn encode_png(image: &RasterImage) -> ForgeResult<Vec<u8>> {
    let straight = image::RgbaImage::from_raw(image.width(), image.height(), image.to_straight_rgba())
        .ok_or_else(|| ForgeError::compositing("raster does not match its dimensions"))?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(straight)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

/// Best-effort MIME type for an uploaded photo; unknown data is reported as JPEG.
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        "image/png"
    } else if bytes.starts_with(&[0xff, 0xd8]) {
        "image/jpeg"
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "image/jpeg"
    }
}

pub fn to_data_uri(bytes: &[u8], mime: &str) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Split a `data:<mime>;base64,<payload>` URI. Returns `None` for anything else.
pub fn parse_data_uri(uri: &str) -> Option<(String, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime = meta.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(payload.trim()).ok()?;
    Some((mime.to_string(), bytes))
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/codec.rs"]
mod tests;
