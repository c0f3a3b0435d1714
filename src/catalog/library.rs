use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{ForgeError, ForgeResult};
use crate::provider::GenerationParams;

const BUILTIN_LIBRARY_JSON: &str = include_str!("library.json");

/// One reusable sticker template: English caption, base visual prompt and mood tags.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemplateItem {
    pub id: String,
    /// English caption.
    pub text: String,
    pub visual: String,
    #[serde(default)]
    pub settings: GenerationParams,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TemplateItem {
    pub fn has_any_tag(&self, wanted: &[String]) -> bool {
        self.tags
            .iter()
            .any(|t| wanted.iter().any(|w| w.eq_ignore_ascii_case(t)))
    }
}

pub fn builtin_library() -> ForgeResult<Vec<TemplateItem>> {
    parse_library(BUILTIN_LIBRARY_JSON)
}

pub fn load_library(path: &Path) -> ForgeResult<Vec<TemplateItem>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read template library {}", path.display()))?;
    parse_library(&text)
}

/// Parse a JSON array of templates. Ids must be unique and non-empty.
pub fn parse_library(json: &str) -> ForgeResult<Vec<TemplateItem>> {
    let items: Vec<TemplateItem> = serde_json::from_str(json)?;
    let mut seen = HashSet::new();
    for item in &items {
        if item.id.trim().is_empty() {
            return Err(ForgeError::validation("template id must be non-empty"));
        }
        if item.visual.trim().is_empty() {
            return Err(ForgeError::validation(format!(
                "template {} has an empty visual prompt",
                item.id
            )));
        }
        if !seen.insert(item.id.as_str()) {
            return Err(ForgeError::validation(format!(
                "duplicate template id {}",
                item.id
            )));
        }
    }
    Ok(items)
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/library.rs"]
mod tests;
