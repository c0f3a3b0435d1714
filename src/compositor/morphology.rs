use rayon::prelude::*;

use crate::foundation::error::{ForgeError, ForgeResult};

/// Neighbourhood shape used by [`dilate_mask`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Footprint {
    /// Offsets with `dx*dx + dy*dy <= r*r`.
    Disc,
    /// Offsets with `|dx| <= r && |dy| <= r`.
    Square,
}

/// Grey-scale dilation: every output sample is the max of the input over the footprint.
///
/// Equivalent to stamping the mask at every offset of the footprint and taking the union,
/// at `O(r * pixels)` instead of `O(r^2 * pixels)`. Samples outside the mask count as empty.
pub fn dilate_mask(
    mask: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    footprint: Footprint,
) -> ForgeResult<Vec<u8>> {
    let w = width as usize;
    let h = height as usize;
    if mask.len() != w.saturating_mul(h) {
        return Err(ForgeError::compositing(
            "dilate_mask expects mask matching width*height",
        ));
    }
    if radius == 0 || mask.is_empty() {
        return Ok(mask.to_vec());
    }

    let r = radius as usize;
    let spans: Vec<usize> = (0..=r)
        .map(|dy| match footprint {
            Footprint::Disc => isqrt(r * r - dy * dy),
            Footprint::Square => r,
        })
        .collect();

    // rows_by_span[s][i] = max of mask over the horizontal window [x - s, x + s].
    let max_span = spans.iter().copied().max().unwrap_or(0);
    let mut rows_by_span = Vec::with_capacity(max_span + 1);
    rows_by_span.push(mask.to_vec());
    for s in 1..=max_span {
        let grown = grow_rows(&rows_by_span[s - 1], w);
        rows_by_span.push(grown);
    }

    let mut out = vec![0u8; mask.len()];
    out.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
        for (dy, &span) in spans.iter().enumerate() {
            let layer = &rows_by_span[span];
            let mut merge = |sy: usize| {
                let src = &layer[sy * w..(sy + 1) * w];
                for (o, &v) in row.iter_mut().zip(src) {
                    if v > *o {
                        *o = v;
                    }
                }
            };
            if y + dy < h {
                merge(y + dy);
            }
            if dy > 0 && y >= dy {
                merge(y - dy);
            }
        }
    });
    Ok(out)
}

fn grow_rows(src: &[u8], w: usize) -> Vec<u8> {
    let mut out = vec![0u8; src.len()];
    out.par_chunks_mut(w)
        .zip(src.par_chunks(w))
        .for_each(|(dst, row)| {
            for x in 0..w {
                let mut m = row[x];
                if x > 0 {
                    m = m.max(row[x - 1]);
                }
                if x + 1 < w {
                    m = m.max(row[x + 1]);
                }
                dst[x] = m;
            }
        });
    out
}

fn isqrt(v: usize) -> usize {
    let mut s = (v as f64).sqrt() as usize;
    while s * s > v {
        s -= 1;
    }
    while (s + 1) * (s + 1) <= v {
        s += 1;
    }
    s
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/morphology.rs"]
mod tests;
