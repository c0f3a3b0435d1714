use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::*;

#[test]
fn zero_concurrency_is_rejected() {
    assert!(TaskScheduler::new(0).is_err());
}

#[tokio::test]
async fn never_exceeds_max_concurrency() {
    let sched = TaskScheduler::new(3).unwrap();
    let running = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let outcomes = sched
        .run_all(
            (0..12).collect(),
            |i: u64| {
                let running = Arc::clone(&running);
                let peak = Arc::clone(&peak);
                async move {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5 + (i % 4) * 3)).await;
                    running.fetch_sub(1, Ordering::SeqCst);
                    i
                }
            },
            |_, _| {},
        )
        .await;

    assert_eq!(outcomes.len(), 12);
    assert!(peak.load(Ordering::SeqCst) <= 3);
    let mut seen: Vec<u64> = outcomes.into_iter().map(|o| o.result.unwrap()).collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..12).collect::<Vec<_>>());
}

#[tokio::test]
async fn results_arrive_in_completion_order() {
    let sched = TaskScheduler::new(4).unwrap();
    let outcomes = sched
        .run_all(
            vec![40u64, 1, 20],
            |ms| async move {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                ms
            },
            |_, _| {},
        )
        .await;
    let order: Vec<usize> = outcomes.iter().map(|o| o.index).collect();
    assert_eq!(order, vec![1, 2, 0]);
}

#[tokio::test]
async fn panics_are_isolated_and_reported() {
    let sched = TaskScheduler::new(2).unwrap();
    let mut ticks = Vec::new();
    let outcomes = sched
        .run_all(
            vec![1u32, 2, 3, 4],
            |n| async move {
                if n == 3 {
                    panic!("item {n} blew up");
                }
                n * 10
            },
            |done, total| ticks.push((done, total)),
        )
        .await;

    assert_eq!(outcomes.len(), 4);
    let failed: Vec<&TaskOutcome<u32>> = outcomes.iter().filter(|o| o.result.is_err()).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].index, 2);
    assert_eq!(
        failed[0].result.as_ref().unwrap_err(),
        &TaskFailure::Panicked("item 3 blew up".into())
    );
    assert_eq!(ticks.last(), Some(&(4, 4)));
    assert_eq!(ticks.len(), 4);
}

#[tokio::test]
async fn spawn_respects_permits() {
    let sched = TaskScheduler::new(1).unwrap();
    let a = sched.spawn(async { 1 });
    let b = sched.spawn(async { 2 });
    assert_eq!(a.await.unwrap() + b.await.unwrap(), 3);
    assert_eq!(sched.in_flight(), 0);
}
