use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinHandle, JoinSet};

use crate::foundation::error::{ForgeError, ForgeResult};

/// Reusable bounded task scheduler: at most `max_concurrency` of its tasks run at once.
///
/// Queued tasks start in submission order as permits free up. One scheduler is meant to be
/// shared by every batch of a service instance rather than created per request.
#[derive(Clone, Debug)]
pub struct TaskScheduler {
    permits: Arc<Semaphore>,
    max_concurrency: usize,
}

/// How a scheduled task ended when it did not return a value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskFailure {
    Panicked(String),
    Cancelled,
}

/// One finished task from [`TaskScheduler::run_all`], tagged with its submission index.
#[derive(Debug)]
pub struct TaskOutcome<T> {
    pub index: usize,
    pub result: Result<T, TaskFailure>,
}

impl TaskScheduler {
    pub fn new(max_concurrency: usize) -> ForgeResult<Self> {
        if max_concurrency == 0 {
            return Err(ForgeError::validation("max_concurrency must be > 0"));
        }
        Ok(Self {
            permits: Arc::new(Semaphore::new(max_concurrency)),
            max_concurrency,
        })
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Tasks currently holding a permit.
    pub fn in_flight(&self) -> usize {
        self.max_concurrency - self.permits.available_permits()
    }

    /// Spawn `fut` on the runtime; it starts once a permit is free.
    pub fn spawn<F, T>(&self, fut: F) -> JoinHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let permits = Arc::clone(&self.permits);
        tokio::spawn(async move {
            let _permit = permits.acquire_owned().await.ok();
            fut.await
        })
    }

    /// Run `task(input)` for every input and return outcomes in completion order.
    ///
    /// A panicking task is reported as [`TaskFailure::Panicked`] for its index and does not
    /// affect the others. `progress(done, total)` fires after every completion.
    pub async fn run_all<I, F, Fut, T>(
        &self,
        inputs: Vec<I>,
        task: F,
        mut progress: impl FnMut(usize, usize),
    ) -> Vec<TaskOutcome<T>>
    where
        F: Fn(I) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let total = inputs.len();
        let mut set = JoinSet::new();
        let mut index_of = HashMap::with_capacity(total);

        for (index, input) in inputs.into_iter().enumerate() {
            let permits = Arc::clone(&self.permits);
            let fut = task(input);
            let handle = set.spawn(async move {
                let _permit = permits.acquire_owned().await.ok();
                fut.await
            });
            index_of.insert(handle.id(), index);
        }

        let mut outcomes = Vec::with_capacity(total);
        while let Some(joined) = set.join_next_with_id().await {
            let (id, result) = match joined {
                Ok((id, value)) => (id, Ok(value)),
                Err(err) => (err.id(), Err(classify(err))),
            };
            let Some(&index) = index_of.get(&id) else {
                continue;
            };
            if let Err(failure) = &result {
                tracing::error!(index, ?failure, "scheduled task did not complete");
            }
            outcomes.push(TaskOutcome { index, result });
            progress(outcomes.len(), total);
        }
        outcomes
    }
}

fn classify(err: JoinError) -> TaskFailure {
    if err.is_panic() {
        TaskFailure::Panicked(panic_message(err.into_panic()))
    } else {
        TaskFailure::Cancelled
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/scheduler.rs"]
mod tests;
