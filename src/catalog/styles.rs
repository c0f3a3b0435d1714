use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity-preserving negative prompt used for photo stickers.
pub const DEFAULT_NEGATIVE_PROFILE: &str = "illustration, cartoon, anime, vector, emoji, graphic styles, flat colors, outlines as illustration, simplified facial features, LINE-style, chibi, drawing, painting, 3d render, clay, plastic, artificial, sketch, completely different person, different face, face swap, identity change, unrecognizable subject, distorted features, warped face";

/// Clauses dropped from the negative profile when an illustrated style is requested.
const ILLUSTRATION_CLAUSES: &[&str] = &[
    "illustration, cartoon, anime, vector, emoji, graphic styles, flat colors, ",
    "drawing, painting, 3d render, clay, plastic, artificial, sketch, ",
];

const PHOTOREAL_MARKERS: &[&str] = &["Photorealistic style only.", "Photorealistic"];

/// Negative prompt for text-subject stickers, which must not depict people.
pub const TEXT_NEGATIVE_PROMPT: &str = "human, person, people, man, woman, girl, boy, face, portrait, realistic human, photograph of person, low quality, blurry, watermark, signature, bad anatomy, cropped, cut off, text";

pub const TEXT_GUIDANCE_SCALE: f32 = 9.0;

const DEFAULT_TEXT_STYLE: &str =
    "3D render or illustrated cartoon style, cute and expressive, high quality sticker";

/// Visual style applied to photo stickers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Anime,
    Cartoon,
    #[serde(rename = "3d")]
    ThreeD,
    /// Photorealistic.
    Real,
}

impl Style {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "anime" => Some(Self::Anime),
            "cartoon" => Some(Self::Cartoon),
            "3d" => Some(Self::ThreeD),
            "real" => Some(Self::Real),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anime => "anime",
            Self::Cartoon => "cartoon",
            Self::ThreeD => "3d",
            Self::Real => "real",
        }
    }

    /// Phrase appended to the visual prompt, leading comma included.
    pub fn descriptor(self) -> &'static str {
        match self {
            Self::Anime => {
                ", anime style, Japanese animation, vibrant colors, cel shaded, studio ghibli aesthetic, 2D flat"
            }
            Self::Cartoon => {
                ", western cartoon style, bold thick outlines, flat vector art, cartoon network aesthetic, expressive"
            }
            Self::ThreeD => {
                ", 3D render, Pixar style, C4D, octane render, clay material, smooth rounded shapes, cute 3D character"
            }
            Self::Real => {
                ", photorealistic, high detail, 8k resolution, raw photography, cinematic lighting, realistic texture"
            }
        }
    }

    pub fn is_illustrated(self) -> bool {
        !matches!(self, Self::Real)
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every valid style named in a comma-separated selector, in order. Unknown names are skipped.
pub fn parse_styles(selector: &str) -> Vec<Style> {
    selector.split(',').filter_map(Style::parse).collect()
}

/// Rewrite a template's visual prompt for `style`.
///
/// The photorealistic style is appended only when the prompt does not already ask for it.
/// Illustrated styles first strip the photorealism constraints from the base prompt.
pub fn apply_style(visual: &str, style: Style) -> String {
    match style {
        Style::Real if visual.contains("Photorealistic") => visual.to_string(),
        Style::Real => format!("{visual}{}", style.descriptor()),
        _ => {
            let mut base = visual.to_string();
            for marker in PHOTOREAL_MARKERS {
                base = base.replace(marker, "");
            }
            format!("{base}{}", style.descriptor())
        }
    }
}

/// Default profile, relaxed for illustrated styles.
pub fn negative_profile_for(style: Option<Style>) -> String {
    let mut profile = DEFAULT_NEGATIVE_PROFILE.to_string();
    if style.is_some_and(Style::is_illustrated) {
        for clause in ILLUSTRATION_CLAUSES {
            profile = profile.replace(clause, "");
        }
    }
    profile
}

/// Style sentence used in text-subject prompts. Unknown or `random` selects a mixed default.
pub fn text_style_description(style: &str) -> &'static str {
    match style.trim().to_lowercase().as_str() {
        "anime" => {
            "Japanese anime style, big expressive eyes, vibrant colors, anime shading, manga aesthetic"
        }
        "cartoon" => {
            "Western cartoon style, bold outlines, exaggerated features, Cartoon Network aesthetic, flat colors"
        }
        "3d" => {
            "3D rendered Pixar/Disney style, soft lighting, smooth surfaces, cute 3D character, high fidelity render"
        }
        "real" | "realistic" => {
            "Photorealistic style, detailed textures, natural lighting, hyper-realistic, 8k resolution"
        }
        "sticker" => {
            "Classic die-cut sticker art, bold white border, vector art style, clean lines, flat shading"
        }
        "pixel" => "Retro 8-bit pixel art style, arcade aesthetic, blocky, nostalgic game asset",
        "handdrawn" => {
            "Hand-drawn sketch style, doodle aesthetic, pencil or marker texture, casual and messy"
        }
        "clay" => {
            "Claymation style, plasticine texture, stop-motion look, rounded soft edges, handmade feel"
        }
        "painting" => {
            "Oil painting style, visible brush strokes, artistic texture, rich colors, expressive"
        }
        _ => DEFAULT_TEXT_STYLE,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/styles.rs"]
mod tests;
