use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::nickname::nickname_for;
use crate::foundation::error::{ForgeError, ForgeResult};
use crate::pipeline::model::Pack;

/// Opaque handle returned by job submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed.min(self.total) * 100) / self.total) as u8
    }
}

/// Current view of one job, as returned by polling.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub id: JobId,
    pub status: JobStatus,
    pub progress: Progress,
    pub result: Option<Pack>,
    pub error: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// External job-status store. Terminal states are final.
pub trait JobStore: Send + Sync {
    fn create(&self, id: JobId);
    fn set_progress(&self, id: JobId, progress: Progress);
    fn complete(&self, id: JobId, pack: Pack);
    fn fail(&self, id: JobId, error: String);
    fn get(&self, id: JobId) -> Option<JobSnapshot>;
}

#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<JobId, JobSnapshot>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn update(&self, id: JobId, f: impl FnOnce(&mut JobSnapshot)) {
        let mut jobs = self.jobs.write().unwrap_or_else(PoisonError::into_inner);
        match jobs.get_mut(&id) {
            Some(job) if job.status == JobStatus::Pending => {
                f(job);
                job.updated_at = Utc::now();
            }
            Some(_) => tracing::debug!(job = %id, "ignoring update to finished job"),
            None => tracing::warn!(job = %id, "update for unknown job"),
        }
    }
}

impl JobStore for InMemoryJobStore {
    fn create(&self, id: JobId) {
        let snapshot = JobSnapshot {
            id,
            status: JobStatus::Pending,
            progress: Progress::default(),
            result: None,
            error: None,
            updated_at: Utc::now(),
        };
        self.jobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, snapshot);
    }

    fn set_progress(&self, id: JobId, progress: Progress) {
        self.update(id, |job| job.progress = progress);
    }

    fn complete(&self, id: JobId, pack: Pack) {
        self.update(id, |job| {
            job.status = JobStatus::Completed;
            job.progress.completed = job.progress.total.max(pack.stickers.len());
            job.progress.total = job.progress.completed;
            job.result = Some(pack);
        });
    }

    fn fail(&self, id: JobId, error: String) {
        self.update(id, |job| {
            job.status = JobStatus::Failed;
            job.error = Some(error);
        });
    }

    fn get(&self, id: JobId) -> Option<JobSnapshot> {
        self.jobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }
}

/// A completed pack with its author attribution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackRecord {
    pub pack: Pack,
    pub author_id: Option<String>,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}

impl PackRecord {
    /// Anonymous packs are attributed to a nickname derived from the pack id.
    pub fn new(pack: Pack, author_id: Option<String>) -> Self {
        let author_name = match &author_id {
            Some(id) => nickname_for(id),
            None => nickname_for(&pack.id.to_string()),
        };
        Self {
            pack,
            author_id,
            author_name,
            created_at: Utc::now(),
        }
    }
}

/// External persistence for finished packs.
pub trait PackStore: Send + Sync {
    fn save(&self, record: PackRecord) -> ForgeResult<()>;
    fn get(&self, pack_id: Uuid) -> Option<PackRecord>;
    /// Most recent first.
    fn recent(&self, limit: usize) -> Vec<PackRecord>;
}

#[derive(Debug, Default)]
pub struct InMemoryPackStore {
    packs: RwLock<Vec<PackRecord>>,
}

impl InMemoryPackStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PackStore for InMemoryPackStore {
    fn save(&self, record: PackRecord) -> ForgeResult<()> {
        let mut packs = self.packs.write().unwrap_or_else(PoisonError::into_inner);
        if packs.iter().any(|p| p.pack.id == record.pack.id) {
            return Err(ForgeError::job(format!(
                "pack {} already stored",
                record.pack.id
            )));
        }
        packs.push(record);
        Ok(())
    }

    fn get(&self, pack_id: Uuid) -> Option<PackRecord> {
        self.packs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|p| p.pack.id == pack_id)
            .cloned()
    }

    fn recent(&self, limit: usize) -> Vec<PackRecord> {
        let packs = self.packs.read().unwrap_or_else(PoisonError::into_inner);
        let mut out: Vec<PackRecord> = packs.iter().rev().take(limit).cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/job/store.rs"]
mod tests;
