//! Runtime configuration: a JSON document with every field defaulted, plus environment
//! overrides for secrets and deployment-specific endpoints.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::compositor::CompositeOptions;
use crate::foundation::error::{ForgeError, ForgeResult};
use crate::pipeline::batch::PanicPolicy;

pub const ENV_API_KEY: &str = "STICKERFORGE_API_KEY";
pub const ENV_BASE_URL: &str = "STICKERFORGE_BASE_URL";
pub const ENV_CALL_TIMEOUT_SECS: &str = "STICKERFORGE_CALL_TIMEOUT_SECS";
pub const ENV_FONT_DIR: &str = "STICKERFORGE_FONT_DIR";
pub const ENV_LLM_API_KEY: &str = "STICKERFORGE_LLM_API_KEY";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    pub provider: ProviderConfig,
    pub compositor: CompositorConfig,
    pub scheduler: SchedulerConfig,
    pub plan: PlanConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub image_to_image_model: String,
    pub text_to_image_model: String,
    pub background_model: String,
    pub vision_model: String,
    pub llm_base_url: String,
    pub llm_api_key: Option<String>,
    pub llm_model: String,
    pub poll_interval_ms: u64,
    /// Upper bound on any single external call, polling included.
    pub call_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://queue.fal.run".into(),
            api_key: None,
            image_to_image_model: "fal-ai/bytedance/seedream/v4/edit".into(),
            text_to_image_model: "fal-ai/bytedance/seedream/v4/text-to-image".into(),
            background_model: "fal-ai/bria/background/remove".into(),
            vision_model: "fal-ai/llava-next".into(),
            llm_base_url: "https://api.openai.com/v1".into(),
            llm_api_key: None,
            llm_model: "gpt-4o-mini".into(),
            poll_interval_ms: 500,
            call_timeout_secs: 120,
        }
    }
}

impl ProviderConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositorConfig {
    #[serde(flatten)]
    pub options: CompositeOptions,
    /// Extra directories scanned for caption fonts on top of the system set.
    pub font_dirs: Vec<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub sticker_concurrency: usize,
    pub aux_concurrency: usize,
    pub panic_policy: PanicPolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            sticker_concurrency: 6,
            aux_concurrency: 2,
            panic_policy: PanicPolicy::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    pub count: usize,
    /// Tag matches below this size are topped up with random library items.
    pub min_pool: usize,
    /// Replaces the built-in template library when set.
    pub library_path: Option<PathBuf>,
    /// Fixed seed for reproducible plans; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            count: 6,
            min_pool: 10,
            library_path: None,
            seed: None,
        }
    }
}

impl ForgeConfig {
    pub fn from_json_str(s: &str) -> ForgeResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path(path: &Path) -> ForgeResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_json_str(&text)
    }

    /// File (or defaults), then process environment overrides, then validation.
    pub fn load(path: Option<&Path>) -> ForgeResult<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_path(p)?,
            None => Self::default(),
        };
        cfg.apply_overrides(|key| std::env::var(key).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ForgeResult<()> {
        if let Some(key) = lookup(ENV_API_KEY) {
            self.provider.api_key = Some(key);
        }
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.provider.base_url = url;
        }
        if let Some(secs) = lookup(ENV_CALL_TIMEOUT_SECS) {
            self.provider.call_timeout_secs = secs.trim().parse().map_err(|_| {
                ForgeError::config(format!("{ENV_CALL_TIMEOUT_SECS} must be an integer"))
            })?;
        }
        if let Some(dir) = lookup(ENV_FONT_DIR) {
            self.compositor.font_dirs.push(PathBuf::from(dir));
        }
        if let Some(key) = lookup(ENV_LLM_API_KEY) {
            self.provider.llm_api_key = Some(key);
        }
        Ok(())
    }

    pub fn validate(&self) -> ForgeResult<()> {
        if self.scheduler.sticker_concurrency == 0 || self.scheduler.aux_concurrency == 0 {
            return Err(ForgeError::config("scheduler concurrency must be > 0"));
        }
        if self.provider.call_timeout_secs == 0 {
            return Err(ForgeError::config("call_timeout_secs must be > 0"));
        }
        let o = &self.compositor.options;
        if o.target_size == 0 {
            return Err(ForgeError::config("compositor target_size must be > 0"));
        }
        for fill in [o.initial_fill, o.final_fill] {
            if !fill.is_finite() || fill <= 0.0 || fill > 1.0 {
                return Err(ForgeError::config("fill ratios must be within (0, 1]"));
            }
        }
        if let Some(shadow) = &o.shadow
            && (!shadow.opacity.is_finite() || !(0.0..=1.0).contains(&shadow.opacity))
        {
            return Err(ForgeError::config("shadow opacity must be within [0, 1]"));
        }
        if self.plan.count == 0 {
            return Err(ForgeError::config("plan count must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
