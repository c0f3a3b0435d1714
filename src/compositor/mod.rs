//! CPU sticker compositor: square framing, silhouette outline, drop shadow and caption.
//!
//! Every stage works on one premultiplied [`RasterImage`] owned by a single call; nothing is
//! shared between concurrent compositing runs except the read-only [`FontBook`].

pub mod blend;
pub mod blur;
pub mod caption;
pub mod codec;
pub mod fonts;
pub mod frame;
pub mod morphology;
pub mod outline;
pub mod raster;
pub mod shadow;

use serde::{Deserialize, Serialize};

use crate::compositor::caption::{CaptionPosition, CaptionStyle, render_caption};
use crate::compositor::codec::{decode_image, encode_png};
use crate::compositor::fonts::FontBook;
use crate::compositor::frame::normalize_to_square;
use crate::compositor::outline::add_outline;
use crate::compositor::raster::RasterImage;
use crate::compositor::shadow::add_drop_shadow;
use crate::foundation::error::ForgeResult;

/// Drop shadow parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowOptions {
    /// Shadow displacement in pixels, `(dx, dy)`.
    pub offset: (i32, i32),
    /// Gaussian kernel radius; sigma is half of it.
    pub blur_radius: u32,
    /// Peak shadow alpha in `[0, 1]`.
    pub opacity: f32,
}

impl Default for ShadowOptions {
    fn default() -> Self {
        Self {
            offset: (5, 5),
            blur_radius: 8,
            opacity: 0.30,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionOptions {
    pub position: CaptionPosition,
    pub style: CaptionStyle,
}

/// Options controlling [`Compositor::composite_sticker`]. `None` disables a stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeOptions {
    /// Upper bound for the square output edge.
    pub target_size: u32,
    /// Fill ratio of the first framing pass.
    pub initial_fill: f32,
    /// Fill ratio of the reframing pass that reclaims outline/shadow growth.
    pub final_fill: f32,
    /// Run both framing passes. Disabling this also drops the square-output guarantee.
    pub normalize: bool,
    /// White outline width in pixels.
    pub outline_px: Option<u32>,
    pub shadow: Option<ShadowOptions>,
    pub caption: Option<CaptionOptions>,
}

impl Default for CompositeOptions {
    fn default() -> Self {
        Self {
            target_size: 512,
            initial_fill: 0.95,
            final_fill: 0.90,
            normalize: true,
            outline_px: Some(10),
            shadow: Some(ShadowOptions::default()),
            caption: Some(CaptionOptions::default()),
        }
    }
}

/// Deterministic sticker compositor bound to a font book and default options.
#[derive(Clone, Debug)]
pub struct Compositor {
    fonts: FontBook,
    opts: CompositeOptions,
}

impl Compositor {
    pub fn new(fonts: FontBook, opts: CompositeOptions) -> Self {
        Self { fonts, opts }
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    pub fn options(&self) -> &CompositeOptions {
        &self.opts
    }

    /// Decode `source`, run every enabled stage, and return PNG bytes.
    ///
    /// Any failure (undecodable bytes, missing fonts, invalid options) is returned as an error;
    /// callers keep the uncomposited image in that case.
    pub fn composite_sticker(&self, source: &[u8], caption: &str) -> ForgeResult<Vec<u8>> {
        self.composite_sticker_with(source, caption, &self.opts)
    }

    #[tracing::instrument(skip(self, source, opts), fields(bytes = source.len()))]
    pub fn composite_sticker_with(
        &self,
        source: &[u8],
        caption: &str,
        opts: &CompositeOptions,
    ) -> ForgeResult<Vec<u8>> {
        let image = decode_image(source)?;
        let out = self.composite_raster(&image, caption, opts)?;
        encode_png(&out)
    }

    pub fn composite_raster(
        &self,
        image: &RasterImage,
        caption: &str,
        opts: &CompositeOptions,
    ) -> ForgeResult<RasterImage> {
        let mut img = if opts.normalize {
            normalize_to_square(image, opts.target_size, opts.initial_fill)?
        } else {
            image.clone()
        };

        if let Some(width) = opts.outline_px {
            img = add_outline(&img, width)?;
        }
        if let Some(shadow) = &opts.shadow {
            img = add_drop_shadow(&img, shadow.offset, shadow.blur_radius, shadow.opacity)?;
        }
        if opts.normalize {
            img = normalize_to_square(&img, opts.target_size, opts.final_fill)?;
        }
        if let Some(cap) = &opts.caption {
            img = render_caption(&img, caption, cap.position, &self.fonts, &cap.style)?;
        }

        tracing::debug!(width = img.width(), height = img.height(), "sticker composited");
        Ok(img)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/mod.rs"]
mod tests;
