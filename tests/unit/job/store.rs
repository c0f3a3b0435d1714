use super::*;
use crate::pipeline::model::StickerRecord;

fn pack(n: usize) -> Pack {
    let stickers = (0..n)
        .map(|i| StickerRecord {
            id: format!("s{i}"),
            caption: String::new(),
            image_ref: "https://x".into(),
            theme: "random".into(),
        })
        .collect();
    Pack::new("Test Pack", stickers)
}

#[test]
fn lifecycle_pending_to_completed() {
    let store = InMemoryJobStore::new();
    let id = JobId::new();
    store.create(id);
    assert_eq!(store.get(id).unwrap().status, JobStatus::Pending);

    store.set_progress(
        id,
        Progress {
            completed: 3,
            total: 6,
        },
    );
    assert_eq!(store.get(id).unwrap().progress.percent(), 50);

    store.complete(id, pack(6));
    let snap = store.get(id).unwrap();
    assert_eq!(snap.status, JobStatus::Completed);
    assert_eq!(snap.progress.percent(), 100);
    assert_eq!(snap.result.unwrap().stickers.len(), 6);
}

#[test]
fn terminal_states_are_final() {
    let store = InMemoryJobStore::new();
    let id = JobId::new();
    store.create(id);
    store.fail(id, "plan failed".into());
    store.complete(id, pack(1));
    let snap = store.get(id).unwrap();
    assert_eq!(snap.status, JobStatus::Failed);
    assert_eq!(snap.error.as_deref(), Some("plan failed"));
    assert!(snap.result.is_none());
}

#[test]
fn unknown_jobs_are_absent() {
    let store = InMemoryJobStore::new();
    assert!(store.get(JobId::new()).is_none());
}

#[test]
fn percent_handles_empty_total() {
    assert_eq!(Progress::default().percent(), 0);
}

#[test]
fn pack_records_get_stable_author_names() {
    let a = PackRecord::new(pack(1), Some("user-1".into()));
    let b = PackRecord::new(pack(1), Some("user-1".into()));
    assert_eq!(a.author_name, b.author_name);
    assert_eq!(a.author_name, nickname_for("user-1"));
}

#[test]
fn pack_store_saves_once_and_lists_recent() {
    let store = InMemoryPackStore::new();
    let first = PackRecord::new(pack(1), None);
    let id = first.pack.id;
    store.save(first.clone()).unwrap();
    assert!(store.save(first).is_err());
    store.save(PackRecord::new(pack(2), None)).unwrap();

    assert_eq!(store.get(id).unwrap().pack.stickers.len(), 1);
    assert_eq!(store.recent(10).len(), 2);
    assert_eq!(store.recent(1).len(), 1);
}
