use rayon::prelude::*;

use crate::compositor::blend::over_in_place;
use crate::compositor::morphology::{Footprint, dilate_mask};
use crate::compositor::raster::RasterImage;
use crate::foundation::error::ForgeResult;

/// Trace the subject silhouette with an opaque white border about `width_px` wide.
///
/// The halo is the union of the alpha mask shifted by every offset inside a disc of radius
/// `width_px`. Any nonzero halo coverage becomes fully opaque white, so soft-edged or
/// translucent subjects still get a solid border. The halo is laid down first and the source
/// is drawn over it, so pixels that were opaque in the source come out unchanged.
pub fn add_outline(image: &RasterImage, width_px: u32) -> ForgeResult<RasterImage> {
    if width_px == 0 {
        return Ok(image.clone());
    }

    let (w, h) = (image.width(), image.height());
    let halo = dilate_mask(&image.alpha_mask(), w, h, width_px, Footprint::Disc)?;

    let mut out = RasterImage::new_transparent(w, h)?;
    out.data_mut()
        .par_chunks_exact_mut(4)
        .zip(halo.par_iter())
        .filter(|(_, a)| **a > 0)
        .for_each(|(px, _)| px.copy_from_slice(&[255; 4]));

    over_in_place(out.data_mut(), image.data())?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/outline.rs"]
mod tests;
