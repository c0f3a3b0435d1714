use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::catalog::library::{builtin_library, load_library};
use crate::compositor::Compositor;
use crate::compositor::fonts::FontBook;
use crate::config::ForgeConfig;
use crate::foundation::error::{ForgeError, ForgeResult};
use crate::job::store::{JobId, JobSnapshot, JobStore, PackRecord, PackStore, Progress};
use crate::pipeline::batch::{BatchRunner, ProgressFn};
use crate::pipeline::model::{Pack, StickerRecord};
use crate::pipeline::scheduler::TaskScheduler;
use crate::pipeline::step::AssetStep;
use crate::plan::builder::PlanBuilder;
use crate::plan::selector::GenerationConfig;
use crate::plan::text_plan::{MAX_SMART_ITEMS, generic_items, suggested_items};
use crate::provider::fallback::{Capability, DEFAULT_PACK_TITLE, recover_call};
use crate::provider::{GenerativeBackend, SourceImage, bounded};

/// Runs whole jobs: plan, sticker batch, title, then reports to the job and pack stores.
///
/// Cheap to clone; every clone shares the same schedulers and stores.
#[derive(Clone)]
pub struct Orchestrator {
    backend: Arc<dyn GenerativeBackend>,
    batch: BatchRunner,
    aux: TaskScheduler,
    planner: PlanBuilder,
    jobs: Arc<dyn JobStore>,
    packs: Arc<dyn PackStore>,
    call_timeout: Duration,
}

impl Orchestrator {
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        batch: BatchRunner,
        aux: TaskScheduler,
        planner: PlanBuilder,
        jobs: Arc<dyn JobStore>,
        packs: Arc<dyn PackStore>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            backend,
            batch,
            aux,
            planner,
            jobs,
            packs,
            call_timeout,
        }
    }

    /// Wire fonts, compositor, library, planner and schedulers from `cfg`.
    pub fn from_config(
        cfg: &ForgeConfig,
        backend: Arc<dyn GenerativeBackend>,
        jobs: Arc<dyn JobStore>,
        packs: Arc<dyn PackStore>,
    ) -> ForgeResult<Self> {
        cfg.validate()?;

        let fonts = FontBook::with_font_dirs(&cfg.compositor.font_dirs);
        if !fonts.has_fonts() {
            tracing::warn!("no caption fonts found; captioned stickers will stay uncomposited");
        }
        let compositor = Arc::new(Compositor::new(fonts, cfg.compositor.options.clone()));

        let library = match &cfg.plan.library_path {
            Some(path) => load_library(path)?,
            None => builtin_library()?,
        };
        let planner = PlanBuilder::new(library)
            .with_count(cfg.plan.count)
            .with_min_pool(cfg.plan.min_pool)
            .with_seed(cfg.plan.seed);

        let call_timeout = cfg.provider.call_timeout();
        let step = AssetStep::new(Arc::clone(&backend), compositor, call_timeout);
        let batch = BatchRunner::new(
            step,
            TaskScheduler::new(cfg.scheduler.sticker_concurrency)?,
            cfg.scheduler.panic_policy,
        );
        let aux = TaskScheduler::new(cfg.scheduler.aux_concurrency)?;

        Ok(Self::new(
            backend,
            batch,
            aux,
            planner,
            jobs,
            packs,
            call_timeout,
        ))
    }

    /// Register a photo job and run it in the background. Must be called inside a runtime.
    pub fn submit_image_job(
        &self,
        photo: Vec<u8>,
        config: GenerationConfig,
        author: Option<String>,
    ) -> JobId {
        let id = JobId::new();
        self.jobs.create(id);
        let this = self.clone();
        tokio::spawn(async move {
            let _ = this.execute_image(id, photo, config, author).await;
        });
        id
    }

    /// Register a text-subject job and run it in the background. Must be called inside a runtime.
    pub fn submit_text_job(
        &self,
        subject: String,
        config: GenerationConfig,
        author: Option<String>,
    ) -> JobId {
        let id = JobId::new();
        self.jobs.create(id);
        let this = self.clone();
        tokio::spawn(async move {
            let _ = this.execute_text(id, subject, config, author).await;
        });
        id
    }

    pub fn poll_job(&self, id: JobId) -> Option<JobSnapshot> {
        self.jobs.get(id)
    }

    /// Run a photo job to completion on the current task.
    pub async fn run_image_job(
        &self,
        photo: Vec<u8>,
        config: GenerationConfig,
        author: Option<String>,
    ) -> ForgeResult<Pack> {
        let id = JobId::new();
        self.jobs.create(id);
        self.execute_image(id, photo, config, author).await
    }

    /// Run a text-subject job to completion on the current task.
    pub async fn run_text_job(
        &self,
        subject: String,
        config: GenerationConfig,
        author: Option<String>,
    ) -> ForgeResult<Pack> {
        let id = JobId::new();
        self.jobs.create(id);
        self.execute_text(id, subject, config, author).await
    }

    #[tracing::instrument(skip(self, photo, author), fields(job = %id, bytes = photo.len()))]
    async fn execute_image(
        &self,
        id: JobId,
        photo: Vec<u8>,
        config: GenerationConfig,
        author: Option<String>,
    ) -> ForgeResult<Pack> {
        tracing::info!("image job started");
        let result = self.image_stickers(id, photo, &config).await;
        self.finish(id, result, author)
    }

    #[tracing::instrument(skip(self, author), fields(job = %id))]
    async fn execute_text(
        &self,
        id: JobId,
        subject: String,
        config: GenerationConfig,
        author: Option<String>,
    ) -> ForgeResult<Pack> {
        tracing::info!("text job started");
        let result = self.text_stickers(id, &subject, &config).await;
        self.finish(id, result, author)
    }

    async fn image_stickers(
        &self,
        id: JobId,
        photo: Vec<u8>,
        config: &GenerationConfig,
    ) -> ForgeResult<(String, Vec<StickerRecord>)> {
        if photo.is_empty() {
            return Err(ForgeError::validation("photo is empty"));
        }
        let source = SourceImage::new(photo);
        let plan = self.planner.build_plan(config)?;
        self.jobs.set_progress(
            id,
            Progress {
                completed: 0,
                total: plan.len(),
            },
        );

        let title_task = {
            let backend = Arc::clone(&self.backend);
            let source = source.clone();
            let limit = self.call_timeout;
            self.aux.spawn(async move {
                recover_call(
                    Capability::DescribeForTitle,
                    bounded(limit, backend.describe_for_title(&source)).await,
                    || DEFAULT_PACK_TITLE.to_string(),
                )
            })
        };
        let sticker_task = {
            let batch = self.batch.clone();
            let progress = self.progress_sink(id);
            self.aux.spawn(async move {
                batch.run_batch(plan, Some(source), Some(progress)).await
            })
        };

        let (title, stickers) = tokio::join!(title_task, sticker_task);
        let title = title.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "title task failed");
            DEFAULT_PACK_TITLE.to_string()
        });
        let stickers =
            stickers.map_err(|err| ForgeError::job(format!("sticker batch aborted: {err}")))?;
        Ok((title, stickers))
    }

    /// Generic items start immediately; the suggested ones follow once the language model
    /// answers. Both batches share the sticker scheduler and report against one total.
    async fn text_stickers(
        &self,
        id: JobId,
        subject: &str,
        config: &GenerationConfig,
    ) -> ForgeResult<(String, Vec<StickerRecord>)> {
        let generic = generic_items(subject, config)?;
        let generic_count = generic.len();
        let combined = Arc::new(CombinedProgress::new(generic_count + MAX_SMART_ITEMS));
        self.jobs.set_progress(id, combined.snapshot());

        let sink = self.combined_sink(id, &combined);
        let generic_run = self.batch.run_batch(generic, None, Some(Arc::clone(&sink)));
        let suggested_run = async {
            let suggested =
                suggested_items(self.backend.as_ref(), subject, config, self.call_timeout).await;
            combined.set_total(generic_count + suggested.len());
            self.batch.run_batch(suggested, None, Some(sink)).await
        };

        let (mut stickers, suggested) = tokio::join!(generic_run, suggested_run);
        stickers.extend(suggested);
        Ok((subject.to_string(), stickers))
    }

    fn combined_sink(&self, id: JobId, combined: &Arc<CombinedProgress>) -> ProgressFn {
        let jobs = Arc::clone(&self.jobs);
        let combined = Arc::clone(combined);
        Arc::new(move |_, _| jobs.set_progress(id, combined.tick()))
    }

    fn progress_sink(&self, id: JobId) -> ProgressFn {
        let jobs = Arc::clone(&self.jobs);
        Arc::new(move |completed, total| jobs.set_progress(id, Progress { completed, total }))
    }

    /// Assemble and persist the pack, or record the failure. A pack whose stickers are all
    /// placeholders still completes; a job with no stickers at all fails.
    fn finish(
        &self,
        id: JobId,
        result: ForgeResult<(String, Vec<StickerRecord>)>,
        author: Option<String>,
    ) -> ForgeResult<Pack> {
        let outcome = result.and_then(|(title, stickers)| {
            if stickers.is_empty() {
                return Err(ForgeError::job("no stickers were produced"));
            }
            let pack = Pack::new(title_case(&title), stickers);
            self.packs.save(PackRecord::new(pack.clone(), author))?;
            Ok(pack)
        });

        match outcome {
            Ok(pack) => {
                tracing::info!(
                    pack = %pack.id,
                    stickers = pack.stickers.len(),
                    placeholders = pack.placeholder_count(),
                    "job completed"
                );
                self.jobs.complete(id, pack.clone());
                Ok(pack)
            }
            Err(err) => {
                tracing::error!(error = %err, "job failed");
                self.jobs.fail(id, err.to_string());
                Err(err)
            }
        }
    }
}

/// Completion count shared by several batches of one job.
struct CombinedProgress {
    completed: AtomicUsize,
    total: AtomicUsize,
}

impl CombinedProgress {
    fn new(total: usize) -> Self {
        Self {
            completed: AtomicUsize::new(0),
            total: AtomicUsize::new(total),
        }
    }

    fn set_total(&self, total: usize) {
        self.total.store(total, Ordering::SeqCst);
    }

    fn tick(&self) -> Progress {
        let completed = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        Progress {
            completed,
            total: self.total.load(Ordering::SeqCst).max(completed),
        }
    }

    fn snapshot(&self) -> Progress {
        Progress {
            completed: self.completed.load(Ordering::SeqCst),
            total: self.total.load(Ordering::SeqCst),
        }
    }
}

/// Capitalize every word; blank input falls back to the default pack title.
pub fn title_case(raw: &str) -> String {
    let words: Vec<String> = raw
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect();
    if words.is_empty() {
        DEFAULT_PACK_TITLE.to_string()
    } else {
        words.join(" ")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/job/orchestrator.rs"]
mod tests;
