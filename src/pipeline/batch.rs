use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::pipeline::model::{StickerRecord, WorkItem};
use crate::pipeline::scheduler::TaskScheduler;
use crate::pipeline::step::AssetStep;
use crate::provider::SourceImage;

/// Progress sink invoked as `(completed, total)` after every finished item.
pub type ProgressFn = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// What to do with an item whose worker panicked instead of returning a record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanicPolicy {
    /// Emit a placeholder record so the batch returns one record per item.
    #[default]
    Placeholder,
    /// Leave the item out of the results.
    Drop,
}

/// Runs asset steps for a batch of work items over a shared [`TaskScheduler`].
#[derive(Clone)]
pub struct BatchRunner {
    step: AssetStep,
    scheduler: TaskScheduler,
    panic_policy: PanicPolicy,
}

impl BatchRunner {
    pub fn new(step: AssetStep, scheduler: TaskScheduler, panic_policy: PanicPolicy) -> Self {
        Self {
            step,
            scheduler,
            panic_policy,
        }
    }

    pub fn scheduler(&self) -> &TaskScheduler {
        &self.scheduler
    }

    /// Generate every item, at most `max_concurrency` at a time, in completion order.
    ///
    /// Normal failures come back as placeholder records, so the result has one record per item
    /// unless a worker panicked under [`PanicPolicy::Drop`].
    #[tracing::instrument(skip_all, fields(items = items.len(), image_mode = source.is_some()))]
    pub async fn run_batch(
        &self,
        items: Vec<WorkItem>,
        source: Option<SourceImage>,
        progress: Option<ProgressFn>,
    ) -> Vec<StickerRecord> {
        let items = Arc::new(items);
        let step = self.step.clone();
        let work: Vec<usize> = (0..items.len()).collect();

        let outcomes = {
            let items = Arc::clone(&items);
            self.scheduler
                .run_all(
                    work,
                    move |index| {
                        let step = step.clone();
                        let items = Arc::clone(&items);
                        let source = source.clone();
                        async move { step.run_one(&items[index], source.as_ref()).await }
                    },
                    |done, total| {
                        if let Some(report) = &progress {
                            report(done, total);
                        }
                    },
                )
                .await
        };

        let mut records = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome.result {
                Ok(record) => records.push(record),
                Err(failure) => {
                    let item = &items[outcome.index];
                    match self.panic_policy {
                        PanicPolicy::Placeholder => {
                            tracing::warn!(item = %item.id, ?failure, "worker failed; emitting placeholder");
                            records.push(StickerRecord::placeholder(item));
                        }
                        PanicPolicy::Drop => {
                            tracing::warn!(item = %item.id, ?failure, "worker failed; dropping item");
                        }
                    }
                }
            }
        }

        tracing::info!(
            records = records.len(),
            placeholders = records.iter().filter(|r| r.is_placeholder()).count(),
            "batch finished"
        );
        records
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/batch.rs"]
mod tests;
