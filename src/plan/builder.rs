use std::collections::HashSet;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::catalog::library::TemplateItem;
use crate::catalog::moods::expand_mood;
use crate::catalog::styles::{Style, apply_style, negative_profile_for, parse_styles};
use crate::catalog::translate::translate_caption;
use crate::foundation::error::{ForgeError, ForgeResult};
use crate::pipeline::model::WorkItem;
use crate::plan::selector::GenerationConfig;

/// Picks templates for a photo pack from a shared library.
#[derive(Clone, Debug)]
pub struct PlanBuilder {
    library: Arc<Vec<TemplateItem>>,
    count: usize,
    min_pool: usize,
    seed: Option<u64>,
}

impl PlanBuilder {
    pub fn new(library: Vec<TemplateItem>) -> Self {
        Self {
            library: Arc::new(library),
            count: 6,
            min_pool: 10,
            seed: None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_min_pool(mut self, min_pool: usize) -> Self {
        self.min_pool = min_pool;
        self
    }

    /// Fixed seed: every call then returns the same plan for the same config.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn library(&self) -> &[TemplateItem] {
        &self.library
    }

    #[tracing::instrument(skip(self), fields(library = self.library.len()))]
    pub fn build_plan(&self, config: &GenerationConfig) -> ForgeResult<Vec<WorkItem>> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let plan = build_plan(
            &self.library,
            config,
            self.count,
            self.min_pool,
            &mut rng,
        )?;
        tracing::debug!(ids = ?plan.iter().map(|w| w.id.as_str()).collect::<Vec<_>>(), "plan built");
        Ok(plan)
    }
}

/// Select up to `count` templates for `config` and turn them into work items.
///
/// Tag matches form the candidate pool; a pool smaller than `min_pool` is topped up with random
/// non-matching templates. The pool is shuffled and walked with id and case-insensitive caption
/// dedup. If dedup leaves the plan short, the remaining library is walked as a reserve.
/// Styles are assigned round-robin in selection order.
pub fn build_plan(
    library: &[TemplateItem],
    config: &GenerationConfig,
    count: usize,
    min_pool: usize,
    rng: &mut StdRng,
) -> ForgeResult<Vec<WorkItem>> {
    if library.is_empty() {
        return Err(ForgeError::plan("template library is empty"));
    }
    if count == 0 {
        return Err(ForgeError::plan("plan count must be > 0"));
    }

    let tags = expand_mood(&config.mood);
    let (mut pool, mut reserve): (Vec<&TemplateItem>, Vec<&TemplateItem>) = if tags.is_empty() {
        (Vec::new(), library.iter().collect())
    } else {
        library.iter().partition(|item| item.has_any_tag(&tags))
    };

    reserve.shuffle(rng);
    if pool.len() < min_pool {
        let take = (min_pool - pool.len()).min(reserve.len());
        pool.extend(reserve.drain(..take));
    }
    pool.shuffle(rng);

    let language = config.language.as_deref();
    let mut seen_ids = HashSet::new();
    let mut seen_captions = HashSet::new();
    let mut selected: Vec<(&TemplateItem, String)> = Vec::with_capacity(count);
    for item in pool.into_iter().chain(reserve) {
        if selected.len() == count {
            break;
        }
        if seen_ids.contains(item.id.as_str()) {
            continue;
        }
        // Captions are compared in the output language; distinct English lines can share a
        // translation.
        let caption = language
            .map(|lang| translate_caption(&item.text, lang))
            .unwrap_or_default();
        let caption_key = match language {
            Some(_) => caption.to_lowercase(),
            None => item.text.to_lowercase(),
        };
        if seen_captions.contains(&caption_key) {
            continue;
        }
        seen_ids.insert(item.id.as_str());
        seen_captions.insert(caption_key);
        selected.push((item, caption));
    }

    let styles = parse_styles(&config.style);
    Ok(selected
        .into_iter()
        .enumerate()
        .map(|(index, (item, caption))| {
            let style = (!styles.is_empty()).then(|| styles[index % styles.len()]);
            work_item(item, style, caption)
        })
        .collect())
}

fn work_item(item: &TemplateItem, style: Option<Style>, caption_text: String) -> WorkItem {
    WorkItem {
        id: item.id.clone(),
        visual_prompt: match style {
            Some(s) => apply_style(&item.visual, s),
            None => item.visual.clone(),
        },
        negative_prompt: negative_profile_for(style),
        caption_text,
        params: item.settings,
        theme: style.map_or("random", Style::as_str).to_string(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plan/builder.rs"]
mod tests;
