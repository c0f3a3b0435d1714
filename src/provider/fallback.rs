//! Capability -> fallback policy.
//!
//! Every external call site resolves its `Result` through [`recover`], which logs the failure
//! and substitutes the value named in [`FALLBACK_TABLE`].

use std::fmt;

use crate::provider::error::ExternalCallError;

/// Sentinel image reference carried by stickers whose generation failed.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/512?text=Error";

/// Pack title used when the title capability fails or returns nothing.
pub const DEFAULT_PACK_TITLE: &str = "New Sticker Pack";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    GenerateImage,
    RemoveBackground,
    FetchImage,
    Composite,
    DescribeForTitle,
    TranslateCaption,
    SuggestTextStickers,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GenerateImage => "generate_image",
            Self::RemoveBackground => "remove_background",
            Self::FetchImage => "fetch_image",
            Self::Composite => "composite",
            Self::DescribeForTitle => "describe_for_title",
            Self::TranslateCaption => "translate_caption",
            Self::SuggestTextStickers => "suggest_text_stickers",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fallback {
    /// Emit a sticker carrying [`PLACEHOLDER_IMAGE_URL`].
    PlaceholderSticker,
    /// Keep using the capability's input unchanged.
    PassThroughInput,
    /// Keep the uncomposited image reference.
    UncompositedImage,
    /// Use [`DEFAULT_PACK_TITLE`].
    DefaultTitle,
    /// Keep the English caption.
    EnglishText,
    /// Use the built-in subject prompt list.
    BuiltinPrompts,
}

pub const FALLBACK_TABLE: &[(Capability, Fallback)] = &[
    (Capability::GenerateImage, Fallback::PlaceholderSticker),
    (Capability::RemoveBackground, Fallback::PassThroughInput),
    (Capability::FetchImage, Fallback::UncompositedImage),
    (Capability::Composite, Fallback::UncompositedImage),
    (Capability::DescribeForTitle, Fallback::DefaultTitle),
    (Capability::TranslateCaption, Fallback::EnglishText),
    (Capability::SuggestTextStickers, Fallback::BuiltinPrompts),
];

pub fn fallback_for(capability: Capability) -> Fallback {
    FALLBACK_TABLE
        .iter()
        .find(|(c, _)| *c == capability)
        .map(|(_, f)| *f)
        .unwrap_or(Fallback::PlaceholderSticker)
}

/// Unwrap `result`, or log the failure and return `fallback()`.
pub fn recover<T, E: fmt::Display>(
    capability: Capability,
    result: Result<T, E>,
    fallback: impl FnOnce() -> T,
) -> T {
    match result {
        Ok(v) => v,
        Err(err) => {
            tracing::warn!(
                capability = %capability,
                fallback = ?fallback_for(capability),
                error = %err,
                "external call failed; using fallback"
            );
            fallback()
        }
    }
}

/// Same as [`recover`] for call sites that already produced an [`ExternalCallError`].
pub fn recover_call<T>(
    capability: Capability,
    result: Result<T, ExternalCallError>,
    fallback: impl FnOnce() -> T,
) -> T {
    recover(capability, result, fallback)
}

#[cfg(test)]
#[path = "../../tests/unit/provider/fallback.rs"]
mod tests;
