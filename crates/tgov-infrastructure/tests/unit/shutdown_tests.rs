//! Shutdown Coordinator Tests

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tgov_infrastructure::shutdown::ShutdownCoordinator;

#[tokio::test]
async fn test_shutdown_with_no_tasks() {
    let coordinator = ShutdownCoordinator::new();
    assert!(!coordinator.is_shutting_down());
    assert_eq!(coordinator.active_tasks(), 0);

    assert!(coordinator.shutdown(Duration::from_secs(1)).await);
    assert!(coordinator.is_shutting_down());
}

#[tokio::test]
async fn test_cancellable_task_stops_on_shutdown() {
    let coordinator = ShutdownCoordinator::new();
    let stopped = Arc::new(AtomicUsize::new(0));

    let flag = Arc::clone(&stopped);
    coordinator.spawn_cancellable("waiter", move |token| async move {
        token.cancelled().await;
        flag.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(coordinator.active_tasks(), 1);

    assert!(coordinator.shutdown(Duration::from_secs(5)).await);
    assert_eq!(stopped.load(Ordering::SeqCst), 1);
    assert_eq!(coordinator.active_tasks(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_times_out_on_stuck_task() {
    let coordinator = ShutdownCoordinator::new();
    coordinator.spawn("stuck", std::future::pending::<()>());

    assert!(!coordinator.shutdown(Duration::from_secs(2)).await);
    assert_eq!(coordinator.active_tasks(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_periodic_task_ticks_until_shutdown() {
    let coordinator = ShutdownCoordinator::new();
    let ticks = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&ticks);
    coordinator.spawn_periodic("counter", Duration::from_secs(10), move || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 0);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 3);

    assert!(coordinator.shutdown(Duration::from_secs(1)).await);
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_child_token_follows_shutdown() {
    let coordinator = ShutdownCoordinator::new();
    let token = coordinator.child_token();
    let clone = coordinator.clone();

    assert!(!token.is_cancelled());
    clone.shutdown(Duration::from_secs(1)).await;
    assert!(token.is_cancelled());
    assert!(coordinator.is_shutting_down());
}
