//! Background task lifecycle
//!
//! Periodic maintenance loops are spawned through a [`ShutdownCoordinator`]:
//! a `CancellationToken` tells them to stop and a `TaskTracker` lets
//! shutdown wait for them.
//!
//! ```rust,ignore
//! let coordinator = ShutdownCoordinator::new();
//! coordinator.spawn_periodic("expiry_sweep", Duration::from_secs(300), move || {
//!     let cache = Arc::clone(&cache);
//!     async move { cache.purge_expired(); }
//! });
//!
//! let completed = coordinator.shutdown(Duration::from_secs(30)).await;
//! ```

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

/// Owner of every background loop
#[derive(Debug, Clone, Default)]
pub struct ShutdownCoordinator {
    cancel_token: CancellationToken,
    task_tracker: TaskTracker,
}

impl ShutdownCoordinator {
    /// Create a coordinator with no tasks
    pub fn new() -> Self {
        Self::default()
    }

    /// Token cancelled when shutdown starts
    pub fn child_token(&self) -> CancellationToken {
        self.cancel_token.child_token()
    }

    /// Whether shutdown has started
    pub fn is_shutting_down(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Tracked tasks still running
    pub fn active_tasks(&self) -> usize {
        self.task_tracker.len()
    }

    /// Spawn and track a task
    pub fn spawn<F>(&self, name: &'static str, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        debug!(task = name, "Spawning tracked task");
        self.task_tracker.spawn(future)
    }

    /// Spawn a task handed a token that is cancelled on shutdown
    pub fn spawn_cancellable<F, Fut>(
        &self,
        name: &'static str,
        task_fn: F,
    ) -> JoinHandle<Fut::Output>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future + Send + 'static,
        Fut::Output: Send + 'static,
    {
        let future = task_fn(self.child_token());
        self.spawn(name, future)
    }

    /// Run `tick` every `period` until shutdown
    ///
    /// The first run happens one full period after spawning. A tick that is
    /// in progress when shutdown starts is allowed to finish.
    pub fn spawn_periodic<F, Fut>(
        &self,
        name: &'static str,
        period: Duration,
        mut tick: F,
    ) -> JoinHandle<()>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.spawn_cancellable(name, move |token| async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval.tick().await;
            loop {
                tokio::select! {
                    () = token.cancelled() => break,
                    _ = interval.tick() => tick().await,
                }
            }
            debug!(task = name, "Periodic task stopped");
        })
    }

    /// Cancel every task and wait for them up to `timeout`
    ///
    /// # Returns
    /// True if every task finished in time
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        info!(
            timeout_secs = timeout.as_secs(),
            active_tasks = self.task_tracker.len(),
            "Stopping background tasks"
        );
        self.cancel_token.cancel();
        self.task_tracker.close();

        tokio::select! {
            () = self.task_tracker.wait() => {
                info!("All background tasks stopped");
                true
            }
            () = tokio::time::sleep(timeout) => {
                warn!(
                    active_tasks = self.task_tracker.len(),
                    "Timed out waiting for background tasks"
                );
                false
            }
        }
    }
}
