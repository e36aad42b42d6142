use std::sync::Arc;

use futures_util::Future;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

/// Bounded spawner with one shared cancellation scope.
///
/// Applies and palette fetches run through a pool so teardown is a single
/// operation: dropping the pool (or calling [`TaskPool::shutdown`]) cancels
/// everything in flight at its next await point. Busy guards release on
/// drop, so a cancelled apply cannot leave a surface marked busy.
pub struct TaskPool {
    semaphore: Arc<Semaphore>,
    cancel_token: CancellationToken,
}

impl TaskPool {
    pub fn new(max_concurrent: usize) -> TaskPool {
        TaskPool {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            cancel_token: CancellationToken::new(),
        }
    }

    /// Spawn `task` once a permit frees up.
    ///
    /// After shutdown the permit is refused and the task never starts.
    pub fn execute<F, T>(&self, task: F)
    where
        F: Future<Output = T> + Send + 'static,
        T: Send,
    {
        let semaphore = self.semaphore.clone();
        let token = self.cancel_token.clone();
        tokio::spawn(async move {
            let bounded = async {
                let Ok(_permit) = semaphore.acquire().await else {
                    return;
                };
                task.await;
            };

            tokio::select! {
                () = bounded => {},
                () = token.cancelled() => {}
            }
        });
    }

    /// Token tied to this pool's lifetime. Loops that are not spawned
    /// through the pool select on it to stop with everything else.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Cancel everything now instead of waiting for Drop.
    pub fn shutdown(&self) {
        self.semaphore.close();
        self.cancel_token.cancel();
    }
}

impl Drop for TaskPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
