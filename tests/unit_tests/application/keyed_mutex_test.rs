use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use auris::application::services::KeyedMutex;

#[tokio::test]
async fn given_released_guard_when_checking_slots_then_key_is_dropped() {
    let locks = KeyedMutex::new();

    {
        let _guard = locks.lock("abc_false").await;
        assert_eq!(locks.active_keys(), 1);
    }

    assert_eq!(locks.active_keys(), 0);
}

#[tokio::test]
async fn given_distinct_keys_when_locking_then_both_are_held_at_once() {
    let locks = KeyedMutex::new();

    let _first = locks.lock("a").await;
    let _second = locks.lock("b").await;

    assert_eq!(locks.active_keys(), 2);
}

#[tokio::test]
async fn given_concurrent_holders_of_same_key_when_running_then_they_never_overlap() {
    let locks = Arc::new(KeyedMutex::new());
    let inside = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let locks = Arc::clone(&locks);
            let inside = Arc::clone(&inside);
            let peak = Arc::clone(&peak);
            tokio::spawn(async move {
                let _guard = locks.lock("same").await;
                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                inside.fetch_sub(1, Ordering::SeqCst);
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(peak.load(Ordering::SeqCst), 1);
    assert_eq!(locks.active_keys(), 0);
}

#[tokio::test]
async fn given_waiter_cancelled_after_release_when_checking_slots_then_key_is_dropped() {
    let locks = Arc::new(KeyedMutex::new());
    let first = locks.lock("k").await;

    let waiter = {
        let locks = Arc::clone(&locks);
        tokio::spawn(async move {
            let _guard = locks.lock("k").await;
        })
    };
    tokio::task::yield_now().await;

    drop(first);
    waiter.abort();
    let _ = waiter.await;

    assert_eq!(locks.active_keys(), 0);
}

#[tokio::test]
async fn given_pending_waiter_cancelled_while_held_when_holder_releases_then_key_is_dropped() {
    let locks = Arc::new(KeyedMutex::new());
    let first = locks.lock("k").await;

    let waiter = {
        let locks = Arc::clone(&locks);
        tokio::spawn(async move {
            let _guard = locks.lock("k").await;
        })
    };
    tokio::task::yield_now().await;
    waiter.abort();
    let _ = waiter.await;

    assert_eq!(locks.active_keys(), 1);
    drop(first);
    assert_eq!(locks.active_keys(), 0);
}
