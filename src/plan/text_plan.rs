use std::time::Duration;

use crate::catalog::styles::{TEXT_GUIDANCE_SCALE, TEXT_NEGATIVE_PROMPT, text_style_description};
use crate::foundation::error::{ForgeError, ForgeResult};
use crate::pipeline::model::WorkItem;
use crate::plan::selector::GenerationConfig;
use crate::provider::fallback::{Capability, recover_call};
use crate::provider::{
    ExternalCallError, GenerationParams, GenerativeBackend, TextStickerIdea, bounded,
};

/// Suggested items added after the two generic ones.
pub const MAX_SMART_ITEMS: usize = 4;

pub const TEXT_THEME: &str = "custom";

/// Native "let's go" / "please no" captions for the two generic stickers.
fn generic_captions(language: &str) -> (&'static str, &'static str) {
    match language {
        "tr" => ("Haydiii", "Yapamam"),
        "es" => ("Vamoos", "No puedo"),
        "de" => ("Los gehts", "Kein Bock"),
        "fr" => ("C'est parti", "La flemme"),
        _ => ("Let's goooo", "Pls no"),
    }
}

/// Built-in ideas used when caption suggestion fails.
pub fn builtin_ideas(subject: &str) -> Vec<TextStickerIdea> {
    let idea = |caption: &str, prompt: String| TextStickerIdea {
        caption: caption.to_string(),
        prompt,
    };
    vec![
        idea(
            "let's goooo",
            format!("Cute excited {subject} themed mascot character celebrating, happy joyful expression, 3D render style, isolated on pure white background, no text"),
        ),
        idea(
            "pls no",
            format!("Cute overwhelmed {subject} themed mascot character, tired exhausted expression, illustrated style, isolated on pure white background, no text"),
        ),
        idea(
            "wait what",
            format!("Cute confused {subject} themed mascot character, shocked bewildered expression, illustrated style, isolated on pure white background, no text"),
        ),
        idea(
            "slay",
            format!("Cute confident {subject} themed mascot character, proud flex pose, 3D render style, isolated on pure white background, no text"),
        ),
        idea(
            "I can't",
            format!("Cute laughing {subject} themed mascot character, chaotic amused energy, illustrated style, isolated on pure white background, no text"),
        ),
        idea(
            "it's fine",
            format!("Cute resigned {subject} themed mascot character, calm acceptance expression, illustrated style, isolated on pure white background, no text"),
        ),
    ]
}

fn text_item(id: String, caption: &str, prompt: String, captions_on: bool) -> WorkItem {
    WorkItem {
        id,
        visual_prompt: prompt,
        negative_prompt: TEXT_NEGATIVE_PROMPT.to_string(),
        caption_text: if captions_on {
            caption.trim().to_string()
        } else {
            String::new()
        },
        params: GenerationParams {
            guidance_scale: TEXT_GUIDANCE_SCALE,
            ..GenerationParams::default()
        },
        theme: TEXT_THEME.to_string(),
    }
}

/// Work items for a text subject: two generic stickers (`gen_1`, `gen_2`) plus up to
/// [`MAX_SMART_ITEMS`] suggested ones (`smart_0..`).
#[tracing::instrument(skip(backend, config))]
pub async fn build_text_plan(
    backend: &dyn GenerativeBackend,
    subject: &str,
    config: &GenerationConfig,
    call_timeout: Duration,
) -> ForgeResult<Vec<WorkItem>> {
    let mut items = generic_items(subject, config)?;
    items.extend(suggested_items(backend, subject, config, call_timeout).await);
    Ok(items)
}

/// The two generic stickers. They need no external call, so they can start right away.
pub fn generic_items(subject: &str, config: &GenerationConfig) -> ForgeResult<Vec<WorkItem>> {
    let subject = subject.trim();
    if subject.is_empty() {
        return Err(ForgeError::plan("text subject must be non-empty"));
    }
    let (go, no) = generic_captions(config.language.as_deref().unwrap_or("en"));
    let captions_on = config.captions_enabled();
    Ok(vec![
        text_item(
            "gen_1".into(),
            go,
            format!("Cute excited {subject} themed character or mascot, happy celebration pose, 3D render style, expressive, isolated on pure white background, no text"),
            captions_on,
        ),
        text_item(
            "gen_2".into(),
            no,
            format!("Cute overwhelmed {subject} themed character or mascot, tired exhausted expression, illustrated style, isolated on pure white background, no text"),
            captions_on,
        ),
    ])
}

/// Up to [`MAX_SMART_ITEMS`] items from the language model, or from [`builtin_ideas`] when the
/// suggestion call fails or comes back empty. Never fails.
pub async fn suggested_items(
    backend: &dyn GenerativeBackend,
    subject: &str,
    config: &GenerationConfig,
    call_timeout: Duration,
) -> Vec<WorkItem> {
    let subject = subject.trim();
    let language = config.language.as_deref().unwrap_or("en");
    let suggested = bounded(
        call_timeout,
        backend.suggest_text_stickers(
            subject,
            &config.mood,
            text_style_description(&config.style),
            language,
        ),
    )
    .await
    .and_then(|ideas| {
        if ideas.is_empty() {
            Err(ExternalCallError::malformed("no suggestions"))
        } else {
            Ok(ideas)
        }
    });
    let ideas = recover_call(Capability::SuggestTextStickers, suggested, || {
        builtin_ideas(subject)
    });

    let captions_on = config.captions_enabled();
    ideas
        .into_iter()
        .take(MAX_SMART_ITEMS)
        .enumerate()
        .map(|(i, idea)| text_item(format!("smart_{i}"), &idea.caption, idea.prompt, captions_on))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/plan/text_plan.rs"]
mod tests;
