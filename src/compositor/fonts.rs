use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{ForgeError, ForgeResult};

/// Caption families in preference order; any other face is used when none of these exist.
pub const PREFERRED_FAMILIES: &[&str] = &[
    "Impact",
    "DejaVu Sans",
    "Liberation Sans",
    "Arial",
    "Helvetica",
];

/// Font faces available to the caption renderer.
#[derive(Clone)]
pub struct FontBook {
    db: Arc<usvg::fontdb::Database>,
}

impl fmt::Debug for FontBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.face_count())
            .finish()
    }
}

/// Coverage of one rendered caption line, cropped to its ink bounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphMask {
    pub width: u32,
    pub height: u32,
    pub alpha: Vec<u8>,
}

impl FontBook {
    /// System fonts plus every `.ttf`/`.otf`/`.ttc` found directly inside `dirs`.
    pub fn with_font_dirs(dirs: &[PathBuf]) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        for dir in dirs {
            load_fonts_from_dir(&mut db, dir);
        }
        Self { db: Arc::new(db) }
    }

    pub fn system() -> Self {
        Self::with_font_dirs(&[])
    }

    pub fn from_database(db: usvg::fontdb::Database) -> Self {
        Self { db: Arc::new(db) }
    }

    /// A book with no faces; every caption render fails with a font error.
    pub fn empty() -> Self {
        Self::from_database(usvg::fontdb::Database::new())
    }

    pub fn face_count(&self) -> usize {
        self.db.faces().count()
    }

    pub fn has_fonts(&self) -> bool {
        self.face_count() > 0
    }

    /// Rasterize `text` as a single bold line at `size_px` and crop to the covered area.
    pub fn rasterize_line(&self, text: &str, size_px: f32) -> ForgeResult<GlyphMask> {
        if !self.has_fonts() {
            return Err(ForgeError::font("no font faces available for captions"));
        }
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ForgeError::validation("caption font size must be > 0"));
        }

        let glyphs = text.chars().count().max(1) as f32;
        let canvas_w = ((glyphs + 2.0) * size_px).ceil() as u32;
        let canvas_h = (size_px * 2.0).ceil() as u32;
        let families = PREFERRED_FAMILIES
            .iter()
            .map(|f| format!("'{f}'"))
            .chain(std::iter::once("sans-serif".to_string()))
            .collect::<Vec<_>>()
            .join(", ");
        let svg = format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{canvas_w}" height="{canvas_h}"><text x="{x}" y="{y}" font-family="{families}" font-weight="bold" font-size="{size_px}" fill="#ffffff">{body}</text></svg>"##,
            x = size_px,
            y = size_px * 1.4,
            body = escape_xml(text),
        );

        let opts = usvg::Options {
            fontdb: self.db.clone(),
            font_resolver: make_caption_font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opts).context("parse caption svg")?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(canvas_w, canvas_h)
            .ok_or_else(|| ForgeError::compositing("failed to allocate caption pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::default(),
            &mut pixmap.as_mut(),
        );

        let alpha: Vec<u8> = pixmap.data().chunks_exact(4).map(|px| px[3]).collect();
        crop_to_ink(&alpha, canvas_w, canvas_h)
            .ok_or_else(|| ForgeError::font("caption rendered without any glyph coverage"))
    }
}

fn crop_to_ink(alpha: &[u8], w: u32, h: u32) -> Option<GlyphMask> {
    let (w, h) = (w as usize, h as usize);
    let (mut x0, mut y0, mut x1, mut y1) = (usize::MAX, usize::MAX, 0usize, 0usize);
    for y in 0..h {
        for x in 0..w {
            if alpha[y * w + x] != 0 {
                x0 = x0.min(x);
                y0 = y0.min(y);
                x1 = x1.max(x);
                y1 = y1.max(y);
            }
        }
    }
    if x0 == usize::MAX {
        return None;
    }
    let (cw, ch) = (x1 - x0 + 1, y1 - y0 + 1);
    let mut out = Vec::with_capacity(cw * ch);
    for y in y0..=y1 {
        out.extend_from_slice(&alpha[y * w + x0..=y * w + x1]);
    }
    Some(GlyphMask {
        width: cw as u32,
        height: ch as u32,
        alpha: out,
    })
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::debug!(dir = %dir.display(), "font dir not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font");
        }
    }
}

/// Resolve the requested families at bold weight, then any bold face, then any face at all.
fn make_caption_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style: usvg::fontdb::Style::Normal,
            };
            if let Some(id) = fontdb.query(&query) {
                return Some(id);
            }

            fontdb
                .faces()
                .find(|f| f.weight.0 >= 600)
                .or_else(|| fontdb.faces().next())
                .map(|f| f.id)
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/fonts.rs"]
mod tests;
