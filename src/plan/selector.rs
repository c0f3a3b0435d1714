use serde::{Deserialize, Serialize};

/// User selection carried through every layer of a job.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Mood chip or comma-separated tags; `random` or empty means unconstrained.
    pub mood: String,
    /// Comma-separated style names; `random` or empty keeps template prompts as-is.
    pub style: String,
    /// Caption language. `None` disables captions.
    pub language: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            mood: "random".into(),
            style: "random".into(),
            language: Some("en".into()),
        }
    }
}

impl GenerationConfig {
    pub fn new(mood: impl Into<String>, style: impl Into<String>, language: Option<&str>) -> Self {
        Self {
            mood: mood.into(),
            style: style.into(),
            language: language
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_lowercase),
        }
    }

    pub fn captions_enabled(&self) -> bool {
        self.language.is_some()
    }
}
